use untrack::params::ParamRemover;
use untrack::{Link, LinkError, Untracker};

fn clean(input: &str) -> String {
    let link = Link::parse_web(input).unwrap();
    Untracker::new().untrack(&link).render().unwrap()
}

#[test]
fn test_mandrill_click_is_unwrapped() {
    assert_eq!(
        clean("https://mandrillapp.com/track/click/12345/example.com?p=eyJwIjoie1widXJsXCI6XCJodHRwOlxcXC9cXFwvZXhhbXBsZS5jb21cIn0ifQ=="),
        "http://example.com"
    );
}

#[test]
fn test_safelinks_are_unwrapped() {
    assert_eq!(
        clean("https://nam02.safelinks.protection.outlook.com/?url=http%3A%2F%2Fexample.com"),
        "http://example.com"
    );
}

#[test]
fn test_utm_params_are_removed() {
    assert_eq!(
        clean("https://example.com/page?utm_source=newsletter&id=5"),
        "https://example.com/page?id=5"
    );
}

#[test]
fn test_twitter_share_param_leaves_no_query() {
    assert_eq!(
        clean("https://twitter.com/user/status/1?s=20"),
        "https://twitter.com/user/status/1"
    );
}

#[test]
fn test_clean_url_is_unchanged() {
    for input in [
        "https://example.com/page?id=5",
        "https://example.com",
        "http://example.com/a/b/",
        "https://example.com/search?q=a%20b&next=%2Fhome",
    ] {
        assert_eq!(clean(input), input);
    }
}

#[test]
fn test_unsupported_scheme_is_rejected() {
    assert!(matches!(
        Link::parse_web("ftp://example.com"),
        Err(LinkError::UnsupportedScheme(_))
    ));
}

#[test]
fn test_google_redirect_then_strip() {
    assert_eq!(
        clean("https://www.google.com/url?q=https%3A%2F%2Fexample.com%2Fpost%3Futm_medium%3Demail%26id%3D9&sa=D"),
        "https://example.com/post?id=9"
    );
}

#[test]
fn test_aclu_link_then_strip() {
    assert_eq!(
        clean("https://link.aclu.org/click/111/aHR0cHM6Ly93d3cuYWNsdS5vcmcvbmV3cz9tcz1lbSZpZD03/222"),
        "https://www.aclu.org/news?id=7"
    );
}

#[test]
fn test_broken_wrapper_is_only_stripped() {
    // The blob is not JSON, so the wrapper stays, minus its own utm tags.
    assert_eq!(
        clean("https://e.customeriomail.com/e/c/aGVsbG8gd29ybGQ_/1?utm_source=x"),
        "https://e.customeriomail.com/e/c/aGVsbG8gd29ybGQ_/1"
    );
}

#[test]
fn test_strip_twice_equals_strip_once() {
    let remover = ParamRemover::new();

    for input in [
        "https://example.com/?utm_a=1&utm_b=2",
        "https://twitter.com/x?s=1&t=2&s=3",
        "https://www.aclu.org/?gs=1&ms&keep",
        "https://example.com/nothing",
        "https://twitter.com/x?s=1&",
        "https://example.com/p?utm_source=a&&id=1",
        "https://example.com/p?keep=1&&",
        "https://example.com/p?utm_source=a&?",
    ] {
        let link = Link::parse_web(input).unwrap();
        let once = remover.strip(&link);
        assert_eq!(remover.strip(&once), once, "input: {input}");
    }
}
