//! Full pipeline tests: grouping, batch publish, manifest drift and sync.

use chrono::Utc;
use snipdeck_core::{compute_groups, Location, PagePriorities, PageScope, Snippet, SnippetKind};
use snipdeck_manifest::{sync_manifest, totals, DeployManifest, DeploySource, DeployState};
use snipdeck_publish::{deploy_all, FsPublisher, Passthrough, PublishRequest, Publisher};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

const BASE_URL: &str = "https://cdn.example.com/assets";

fn snippet(
    name: &str,
    content: &str,
    kind: SnippetKind,
    location: Location,
    pages: PageScope,
) -> Snippet {
    Snippet {
        id: Uuid::new_v4(),
        name: name.to_string(),
        content: content.to_string(),
        kind,
        location,
        pages,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn passthrough_publisher(root: &TempDir) -> FsPublisher {
    FsPublisher::new(root.path(), BASE_URL, Box::new(Passthrough))
}

fn load_manifest(root: &TempDir) -> DeployManifest {
    DeployManifest::load(&DeployManifest::path_in(root.path())).unwrap()
}

#[tokio::test]
async fn test_group_batch_lands_assets_manifest_and_log() {
    let root = TempDir::new().unwrap();
    let publisher = passthrough_publisher(&root);

    let snippets = vec![
        snippet(
            "Base styles",
            ".base { margin: 0; }",
            SnippetKind::Css,
            Location::Head,
            PageScope::All,
        ),
        snippet(
            "Promo styles",
            ".promo { color: red; }",
            SnippetKind::Css,
            Location::Head,
            PageScope::All,
        ),
        snippet(
            "Cart tracker",
            "console.log('cart');",
            SnippetKind::Js,
            Location::Footer,
            PageScope::Cart,
        ),
    ];
    let groups = compute_groups(&snippets, &PagePriorities::default());
    assert_eq!(groups.len(), 2);

    // 1. Deploy every group in one batch run
    let requests: Vec<PublishRequest> = groups.iter().map(PublishRequest::from_group).collect();
    let outcome = deploy_all(&publisher, requests, Duration::ZERO, Duration::from_secs(5)).await;
    assert_eq!(outcome.deployed.len(), 2);
    assert!(outcome.failed.is_empty());

    // 2. Assets land under assets/, members concatenated in group order
    let css =
        fs::read_to_string(root.path().join("assets").join("css-head-allpages.min.css")).unwrap();
    assert_eq!(css, ".base { margin: 0; }\n.promo { color: red; }");
    assert!(root
        .path()
        .join("assets")
        .join("js-footer-cartpage.min.js")
        .exists());

    // 3. The manifest records one entry per group, under the group identity
    let manifest = load_manifest(&root);
    assert_eq!(manifest.len(), 2);
    let entry = manifest.get_by_filename("css-head-allpages.min.css").unwrap();
    assert_eq!(entry.name, groups[0].display_name());
    assert_eq!(entry.source, DeploySource::LocalDeploy);
    assert_eq!(manifest.deploy_state(&snippets[0]), DeployState::NeverDeployed);

    // 4. Each deploy appends one log line
    let log = fs::read_to_string(root.path().join("deploy.log")).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(log.lines().all(|line| line.starts_with('[')));
    assert!(log.contains("Deploy: css-head-allpages.min.css"));
}

#[tokio::test]
async fn test_individual_deploy_tracks_content_drift() {
    let root = TempDir::new().unwrap();
    let publisher = passthrough_publisher(&root);
    let mut promo = snippet(
        "Promo banner",
        ".promo { color: red; }",
        SnippetKind::Css,
        Location::Head,
        PageScope::Home,
    );

    assert_eq!(
        load_manifest(&root).deploy_state(&promo),
        DeployState::NeverDeployed
    );

    publisher
        .publish(&PublishRequest::from_snippet(&promo))
        .await
        .unwrap();
    assert_eq!(load_manifest(&root).deploy_state(&promo), DeployState::Current);

    // Editing the snippet makes the deployed copy stale
    promo.content = ".promo { color: blue; }".to_string();
    assert_eq!(load_manifest(&root).deploy_state(&promo), DeployState::Stale);

    // Redeploying catches the manifest back up
    publisher
        .publish(&PublishRequest::from_snippet(&promo))
        .await
        .unwrap();
    assert_eq!(load_manifest(&root).deploy_state(&promo), DeployState::Current);
}

#[tokio::test]
async fn test_sync_reconciles_manifest_with_asset_tree() {
    let root = TempDir::new().unwrap();
    let publisher = passthrough_publisher(&root);
    let assets_dir = root.path().join("assets");

    let promo = snippet(
        "Promo banner",
        ".promo { color: red; }",
        SnippetKind::Css,
        Location::Head,
        PageScope::All,
    );
    publisher
        .publish(&PublishRequest::from_snippet(&promo))
        .await
        .unwrap();

    // A file someone pushed straight into the asset tree
    fs::write(assets_dir.join("legacy-widget.min.js"), "let w = 1;").unwrap();

    // 1. First pass keeps the deploy and discovers the foreign file
    let mut manifest = load_manifest(&root);
    let report = sync_manifest(&mut manifest, &assets_dir, BASE_URL).unwrap();
    assert_eq!(report.kept, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.dropped, 0);
    assert_eq!(manifest.len(), 2);

    let kept = manifest.get(promo.id).unwrap();
    assert_eq!(kept.name, "Promo banner");
    assert_eq!(kept.source, DeploySource::GithubSync);

    let discovered = manifest.get_by_filename("legacy-widget.min.js").unwrap();
    assert_eq!(discovered.name, "Legacy Widget");
    assert_eq!(discovered.content_hash, None);

    // 2. Second pass drops the synced entry once its file is gone
    fs::remove_file(assets_dir.join("legacy-widget.min.js")).unwrap();
    let report = sync_manifest(&mut manifest, &assets_dir, BASE_URL).unwrap();
    assert_eq!(report.kept, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.dropped, 1);

    let summary = totals(&manifest);
    assert_eq!(summary.total, 1);
    assert_eq!(summary.css, 1);
    assert_eq!(summary.js, 0);
    assert_eq!(summary.github_synced, 1);
    assert_eq!(summary.local_deploys, 0);
    assert_eq!(summary.size, promo.content.len() as u64);
}
