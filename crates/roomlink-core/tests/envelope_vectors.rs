//! Envelope decode vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomlink_core::protocol::{decode, Payload};

use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "clientlist_ok.json",
        "clientlist_null.json",
        "clientlist_absent.json",
        "servermsg_ok.json",
        "unknown_header.json",
        "missing_header.json",
        "not_json.json",
        "array_frame.json",
    ];

    for f in files {
        let v = load(f);
        let res = decode(&v.frame);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected ok envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.header, ex.header, "vector={}", v.description);
        assert_eq!(env.known_header().is_some(), ex.known, "vector={}", v.description);

        let kind = match env.payload() {
            Payload::Absent => "absent",
            Payload::Null => "null",
            Payload::Value(_) => "value",
        };
        assert_eq!(kind, ex.payload, "vector={}", v.description);
    }
}

#[test]
fn servermsg_payload_is_not_trimmed() {
    let v = load("servermsg_ok.json");
    let env = decode(&v.frame).unwrap();
    let text = env
        .payload()
        .as_string(env.known_header().unwrap())
        .unwrap();
    assert_eq!(text, "  hello  ");
}
