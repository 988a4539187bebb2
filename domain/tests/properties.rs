//! Property tests for the link engine invariants:
//! - a transform yields either a URL or an error, and blank input is required
//! - produced URLs are accepted unchanged when fed back as input
//! - blank titles never count as complete
//! - incomplete links are never active
//! - `meta.rawInput` always echoes the trimmed input

use domain::policy::is_complete;
use domain::{process_link, transform, LinkInput, LinkType, TransformError};
use proptest::prelude::*;

fn link_type() -> impl Strategy<Value = LinkType> {
    prop::sample::select(LinkType::ALL.to_vec())
}

/// Inputs mixing well-formed values of every kind with noise.
fn raw_input() -> impl Strategy<Value = String> {
    prop_oneof![
        "@?[A-Za-z0-9._]{1,20}",
        "[a-z0-9.]{1,10}@[a-z0-9]{1,10}\\.[a-z]{2,5}",
        "\\+?[1-9][0-9 ()-]{6,14}",
        "[a-z0-9-]{1,12}\\.[a-z]{2,6}(/[a-z0-9]{0,8})?",
        "https?://(www\\.)?(instagram|facebook|example)\\.com/[a-z0-9._]{1,12}",
        "\\PC{0,30}",
    ]
}

fn blank() -> impl Strategy<Value = String> {
    "[ \t]{0,4}"
}

proptest! {
    #[test]
    fn blank_input_is_always_required(t in link_type(), raw in blank()) {
        prop_assert_eq!(transform(t, &raw), Err(TransformError::InputRequired));
    }

    #[test]
    fn produced_url_round_trips(t in link_type(), raw in raw_input()) {
        if let Ok(url) = transform(t, &raw) {
            // Phone URIs need at least eight digits to match the tel: pattern.
            let short_phone = t == LinkType::Phone
                && url.chars().filter(char::is_ascii_digit).count() < 8;
            if !short_phone {
                prop_assert_eq!(transform(t, &url), Ok(url.clone()));
            }
        }
    }

    #[test]
    fn blank_title_is_never_complete(t in link_type(), title in blank(), raw in raw_input()) {
        prop_assert!(!is_complete(t, &title, &raw));
    }

    #[test]
    fn incomplete_is_never_active(
        t in link_type(),
        title in proptest::option::of("\\PC{0,170}"),
        raw in raw_input(),
        active in proptest::option::of(any::<bool>()),
    ) {
        let out = process_link(&LinkInput {
            link_type: t,
            title,
            raw_input: raw.clone(),
            order_index: None,
            is_active: active,
        });
        if out.is_incomplete {
            prop_assert!(!out.is_active);
        }
        prop_assert_eq!(out.url.is_some(), transform(t, &raw).is_ok());
        prop_assert!(!out.title.trim().is_empty());
        prop_assert_eq!(out.meta.raw_input.as_str(), raw.trim());
    }
}
