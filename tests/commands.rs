mod common;

use common::FakeForge;
use repo_transfer::{
    commands::{delete_repo, list_repos, set_visibility, CommandOutcome},
    TransferError, TransferErrorKind,
};

const ORG: &str = "lila-hiring";

fn forge_with_repos(dir: &tempfile::TempDir) -> FakeForge {
    let forge = FakeForge::new(dir.path(), &[ORG]);
    forge.insert_repo(ORG, "exercise-aB3dE9", "unused", true);
    forge.insert_repo(ORG, "exercise-Zz0011", "unused", false);
    forge
}

fn refuse(_: &str) -> Result<bool, TransferError> {
    Ok(false)
}

fn accept(_: &str) -> Result<bool, TransferError> {
    Ok(true)
}

#[tokio::test]
async fn list_returns_every_repository() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let repos = list_repos(&forge, ORG).await.unwrap();

    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["exercise-Zz0011", "exercise-aB3dE9"]);
    assert_eq!(repos[0].html_url, "https://forge.test/lila-hiring/exercise-Zz0011");
}

#[tokio::test]
async fn list_unknown_org_fails() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let err = list_repos(&forge, "nobody").await.unwrap_err();

    assert_eq!(err.kind(), &TransferErrorKind::GetOrganization);
}

#[tokio::test]
async fn delete_asks_and_can_be_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let outcome = delete_repo(&forge, ORG, "exercise-aB3dE9", false, &mut refuse)
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Declined);
    assert!(forge.repo(ORG, "exercise-aB3dE9").is_some());
}

#[tokio::test]
async fn delete_after_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let outcome = delete_repo(&forge, ORG, "exercise-aB3dE9", false, &mut accept)
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed);
    assert!(forge.repo(ORG, "exercise-aB3dE9").is_none());
    assert!(forge.repo(ORG, "exercise-Zz0011").is_some());
}

#[tokio::test]
async fn forced_delete_skips_question() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);
    let mut asked = 0;
    let mut prompt = |_: &str| -> Result<bool, TransferError> {
        asked += 1;
        Ok(false)
    };

    let outcome = delete_repo(&forge, ORG, "exercise-aB3dE9", true, &mut prompt)
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed);
    assert_eq!(asked, 0);
    assert!(forge.repo(ORG, "exercise-aB3dE9").is_none());
}

#[tokio::test]
async fn forced_delete_of_missing_repo_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let err = delete_repo(&forge, ORG, "ghost", true, &mut accept)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(forge.repos_of(ORG).len(), 2);
}

#[tokio::test]
async fn making_public_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let repo = set_visibility(&forge, ORG, "exercise-aB3dE9", true)
        .await
        .unwrap();
    assert!(!repo.private);
    assert_eq!(repo.visibility(), "public");

    let again = set_visibility(&forge, ORG, "exercise-aB3dE9", true)
        .await
        .unwrap();
    assert!(!again.private);
    assert!(!forge.repo(ORG, "exercise-aB3dE9").unwrap().private);
    assert_eq!(*forge.visibility_edits.lock().unwrap(), 1);
}

#[tokio::test]
async fn making_private() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let repo = set_visibility(&forge, ORG, "exercise-Zz0011", false)
        .await
        .unwrap();

    assert!(repo.private);
    assert!(forge.repo(ORG, "exercise-Zz0011").unwrap().private);
}

#[tokio::test]
async fn visibility_of_missing_repo_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge_with_repos(&dir);

    let err = set_visibility(&forge, ORG, "ghost", true).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(*forge.visibility_edits.lock().unwrap(), 0);
}
