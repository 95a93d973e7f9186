//! Integration tests for background artifact loading

use std::path::Path;
use tempfile::TempDir;
use tmb_common::events::{EventBus, TmbEvent};
use tmb_common::Artifact;
use tmb_web::loader;

fn write_artifacts(dir: &Path, dt_json: &str) {
    std::fs::write(
        dir.join("info.json"),
        r#"{"title":"Loader Test","meta_info":""}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("meta.csv"),
        "10.1/a,A Paper,Jane Smith,Journal,1,1,2001,1-2\n",
    )
    .unwrap();
    std::fs::write(dir.join("dt.json"), dt_json).unwrap();
    std::fs::write(
        dir.join("tw.json"),
        r#"{"alpha":[0.5],"tw":[{"words":["w"],"weights":[1.0]}]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("doc_len.json"), r#"{"doc_len":[4]}"#).unwrap();
}

#[tokio::test]
async fn test_all_artifacts_installed_and_announced() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path(), r#"{"i":[0],"p":[0,1],"x":[2.0]}"#);

    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let state = loader::bootstrap(dir.path(), bus).await.unwrap();
    loader::load_all(&state).await;

    let corpus = state.corpus.read().await;
    for artifact in Artifact::ALL {
        assert!(corpus.is_loaded(artifact), "{} should be loaded", artifact);
    }

    let mut announced = Vec::new();
    for _ in 0..loader::BACKGROUND_ARTIFACTS.len() {
        match rx.recv().await.unwrap() {
            TmbEvent::ArtifactLoaded { artifact, .. } => announced.push(artifact),
            other => panic!("unexpected event {:?}", other),
        }
    }
    announced.sort();
    assert_eq!(announced, loader::BACKGROUND_ARTIFACTS.to_vec());
}

#[tokio::test]
async fn test_broken_artifact_stays_missing() {
    let dir = TempDir::new().unwrap();
    // last column pointer does not match the entry count
    write_artifacts(dir.path(), r#"{"i":[0],"p":[0,3],"x":[2.0]}"#);

    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let state = loader::bootstrap(dir.path(), bus).await.unwrap();
    loader::load_all(&state).await;

    {
        let corpus = state.corpus.read().await;
        assert_eq!(corpus.missing(&Artifact::ALL), vec![Artifact::DocTopics]);
    }

    let mut failed = Vec::new();
    for _ in 0..loader::BACKGROUND_ARTIFACTS.len() {
        if let TmbEvent::ArtifactFailed { artifact, .. } = rx.recv().await.unwrap() {
            failed.push(artifact);
        }
    }
    assert_eq!(failed, vec![Artifact::DocTopics]);
}

#[tokio::test]
async fn test_second_install_is_ignored() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path(), r#"{"i":[0],"p":[0,1],"x":[2.0]}"#);

    let state = loader::bootstrap(dir.path(), EventBus::new(16)).await.unwrap();
    assert!(loader::load_artifact(&state, Artifact::Meta).await.unwrap());
    assert!(!loader::load_artifact(&state, Artifact::Meta).await.unwrap());
}

#[tokio::test]
async fn test_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path(), r#"{"i":[],"p":[0],"x":[]}"#);
    std::fs::remove_file(dir.path().join("doc_len.json")).unwrap();

    let state = loader::bootstrap(dir.path(), EventBus::new(16)).await.unwrap();
    assert!(loader::load_artifact(&state, Artifact::DocLengths).await.is_err());
    assert!(!state.corpus.read().await.is_loaded(Artifact::DocLengths));
}
