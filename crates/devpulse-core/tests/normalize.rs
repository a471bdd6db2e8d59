use devpulse_core::{normalize, DevpulseError, RepositoryReference};

#[test]
fn documented_inputs_normalize_to_vercel_next() {
    let expected = RepositoryReference::new("vercel", "next.js").unwrap();
    for raw in [
        "vercel/next.js",
        "https://github.com/vercel/next.js.git",
        "github.com/vercel/next.js?tab=readme",
    ] {
        assert_eq!(normalize(raw).unwrap(), expected, "input {raw:?}");
    }
}

#[test]
fn documented_rejections() {
    for raw in ["", "vercel", "/"] {
        let err = normalize(raw).unwrap_err();
        assert!(
            matches!(err, DevpulseError::InvalidReference(_)),
            "input {raw:?} gave {err}"
        );
    }
}

#[test]
fn normalized_parts_are_path_safe() {
    let repo = normalize("https://github.com/rust-lang/rust.git/?tab=readme#top").unwrap();
    for part in [repo.owner(), repo.name()] {
        assert!(!part.is_empty());
        assert!(!part.contains('/'));
        assert!(!part.contains('?'));
        assert!(!part.contains('#'));
        assert!(!part.ends_with(".git"));
        assert!(part != "." && part != "..");
    }
}

#[test]
fn dot_segments_are_rejected() {
    for raw in ["vercel/..", "../next.js", "vercel/.", "github.com/./next.js"] {
        assert!(
            matches!(normalize(raw), Err(DevpulseError::InvalidReference(_))),
            "input {raw:?}"
        );
    }
}

#[test]
fn reference_serializes_as_struct() {
    let repo = normalize("octocat/hello-world").unwrap();
    let json = serde_json::to_value(&repo).unwrap();
    assert_eq!(json["owner"], "octocat");
    assert_eq!(json["name"], "hello-world");
}
