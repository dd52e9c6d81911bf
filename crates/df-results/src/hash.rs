//! Content-based hashing for run IDs.

use df_flow::FlowConfig;
use df_project::TestDef;
use sha2::{Digest, Sha256};

/// Run id over everything that affects the processed output: the test and
/// its source options, the pipeline settings, the raw input file content and
/// the engine version.
pub fn compute_run_id(
    test: &TestDef,
    settings: &FlowConfig,
    data_digest: &str,
    engine_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(test.id.as_bytes());
    let source_json = serde_json::to_string(&test.source).unwrap_or_default();
    hasher.update(source_json.as_bytes());

    let settings_json = serde_json::to_string(settings).unwrap_or_default();
    hasher.update(settings_json.as_bytes());

    hasher.update(data_digest.as_bytes());
    hasher.update(engine_version.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// SHA-256 of raw input bytes, hex encoded.
pub fn digest_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_data::SourceOptions;

    fn test_def(id: &str) -> TestDef {
        TestDef {
            id: id.to_string(),
            description: None,
            source: SourceOptions::new(format!("{id}.csv")),
            tree_sources: vec![],
        }
    }

    #[test]
    fn hash_stability() {
        let test = test_def("Alpha2");
        let settings = FlowConfig::default();
        let digest = digest_bytes(b"testing_time,P1.20\n-1,0.1\n");

        let hash1 = compute_run_id(&test, &settings, &digest, "v1");
        let hash2 = compute_run_id(&test, &settings, &digest, "v1");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let settings = FlowConfig::default();
        let base = compute_run_id(&test_def("Alpha2"), &settings, "d", "v1");

        assert_ne!(base, compute_run_id(&test_def("Beta1"), &settings, "d", "v1"));
        assert_ne!(base, compute_run_id(&test_def("Alpha2"), &settings, "e", "v1"));
        assert_ne!(base, compute_run_id(&test_def("Alpha2"), &settings, "d", "v2"));

        let mut tuned = FlowConfig::default();
        tuned.flow.discharge_coefficient = 0.7;
        assert_ne!(base, compute_run_id(&test_def("Alpha2"), &tuned, "d", "v1"));
    }

    #[test]
    fn description_does_not_change_run_id() {
        let settings = FlowConfig::default();
        let mut described = test_def("Gamma");
        described.description = Some("repeat".into());
        assert_eq!(
            compute_run_id(&test_def("Gamma"), &settings, "d", "v1"),
            compute_run_id(&described, &settings, "d", "v1")
        );
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            digest_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
