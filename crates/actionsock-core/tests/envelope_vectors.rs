//! Envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use actionsock_core::protocol::Envelope;

use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "envelope_min.json",
        "envelope_full.json",
        "envelope_unknown_action.json",
        "envelope_unknown_field.json",
        "envelope_payload_array.json",
        "envelope_missing_action.json",
    ];

    for f in files {
        let v = load(f);
        let res = Envelope::from_json(&v.frame_text());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected ok envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.action.as_str(), ex["action"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(
            env.sub_action.map(|s| s.as_str()),
            ex["subAction"].as_str(),
            "vector={}",
            v.description
        );
        assert_eq!(env.auth.as_deref(), ex["auth"].as_str(), "vector={}", v.description);
        assert_eq!(
            env.payload.is_some(),
            ex["has_payload"].as_bool().unwrap(),
            "vector={}",
            v.description
        );
    }
}

#[test]
fn full_envelope_keeps_payload_verbatim() {
    let v = load("envelope_full.json");
    let env = Envelope::from_json(&v.frame_text()).unwrap();
    assert_eq!(env.payload.as_ref(), v.frame.get("payload"));
    assert_eq!(env.message.as_deref(), Some("hello"));
}
