mod common;

use axum::http::StatusCode;
use common::{MockAzure, COMMIT_ID, MAIN, REPO_URL, ROOT_OBJECT_ID};
use repofetch::{
    AzureProvider, CallContext, CloneOptions, Error, ErrorKind, FetchOptions, RemoteProvider,
};
use std::sync::Arc;

fn yml(reference: &str) -> FetchOptions {
    FetchOptions::new(REPO_URL, reference).extensions([".yml"])
}

#[tokio::test]
async fn test_lists_filtered_tree_at_branch() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();

    let paths = provider
        .list_tree(&CallContext::background(), &yml(MAIN))
        .await?;

    // Suffix matching is case-sensitive: `/stacks/web.YML` is left out.
    assert_eq!(paths, vec!["/docker-compose.yml", "/stacks/web.yml"]);
    assert_eq!(mock.state.hits(), (1, 1, 1));

    let query = mock.state.last_items_query.lock().unwrap().clone();
    assert_eq!(query["scopePath"], "/");
    assert_eq!(query["versionDescriptor.versionType"], "branch");
    assert_eq!(query["versionDescriptor.version"], "main");
    assert_eq!(query["api-version"], "6.0");
    assert_eq!(
        mock.state.last_tree_object_id.lock().unwrap().as_deref(),
        Some(ROOT_OBJECT_ID)
    );
    Ok(())
}

#[tokio::test]
async fn test_no_extensions_returns_every_path() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let paths = mock
        .provider()
        .list_tree(&CallContext::background(), &FetchOptions::new(REPO_URL, MAIN))
        .await?;
    assert_eq!(paths.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_second_listing_is_served_from_cache() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();
    let ctx = CallContext::background();

    let first = provider.list_tree(&ctx, &yml(MAIN)).await?;
    let second = provider.list_tree(&ctx, &yml(MAIN)).await?;
    assert_eq!(first, second);
    assert_eq!(mock.state.hits(), (1, 1, 1));

    // A different filter over the same reference is still a cache hit.
    let md = provider
        .list_tree(&ctx, &FetchOptions::new(REPO_URL, MAIN).extensions([".md"]))
        .await?;
    assert_eq!(md, vec!["/README.md"]);
    assert_eq!(mock.state.hits(), (1, 1, 1));
    Ok(())
}

#[tokio::test]
async fn test_other_reference_reuses_cached_refs() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();
    let ctx = CallContext::background();

    provider.list_tree(&ctx, &yml(MAIN)).await?;
    provider.list_tree(&ctx, &yml("refs/tags/v1.0")).await?;

    // One refs call, but a root item and a tree per reference.
    assert_eq!(mock.state.hits(), (1, 2, 2));
    let query = mock.state.last_items_query.lock().unwrap().clone();
    assert_eq!(query["versionDescriptor.versionType"], "tag");
    assert_eq!(query["versionDescriptor.version"], "v1.0");
    Ok(())
}

#[tokio::test]
async fn test_remove_cache_forces_refetch() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();
    let ctx = CallContext::background();

    provider.list_tree(&ctx, &yml(MAIN)).await?;
    provider.remove_cache(&CloneOptions::new(REPO_URL).reference_name(MAIN));
    mock.state
        .tree_paths
        .lock()
        .unwrap()
        .push("/new.yml".to_string());

    let paths = provider.list_tree(&ctx, &yml(MAIN)).await?;
    assert_eq!(paths, vec!["/docker-compose.yml", "/stacks/web.yml", "/new.yml"]);
    assert_eq!(mock.state.hits(), (2, 2, 2));
    Ok(())
}

#[tokio::test]
async fn test_disabled_cache_always_refetches() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = AzureProvider::new(&mock.config(false))?;
    let ctx = CallContext::background();

    provider.list_tree(&ctx, &yml(MAIN)).await?;
    provider.list_tree(&ctx, &yml(MAIN)).await?;

    assert_eq!(mock.state.hits(), (2, 2, 2));
    assert!(provider.cache().get_refs(REPO_URL).is_none());
    Ok(())
}

#[tokio::test]
async fn test_missing_reference_skips_root_item() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();

    let result = provider
        .list_tree(&CallContext::background(), &yml("refs/heads/missing"))
        .await;

    match result {
        Err(Error::ReferenceNotFound { name }) => assert_eq!(name, "refs/heads/missing"),
        other => panic!("Expected ReferenceNotFound, got {:?}", other),
    }
    assert_eq!(mock.state.hits(), (1, 0, 0));
    // The reference list itself was still fetched successfully and kept.
    assert!(provider.cache().get_refs(REPO_URL).is_some());
    Ok(())
}

#[tokio::test]
async fn test_head_is_never_a_listed_reference() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();
    let ctx = CallContext::background();

    let refs = provider.list_remote(&ctx, &CloneOptions::new(REPO_URL)).await?;
    assert_eq!(refs, vec![MAIN, "refs/heads/dev", "refs/tags/v1.0"]);

    let result = provider.list_tree(&ctx, &yml("HEAD")).await;
    assert!(matches!(result, Err(Error::ReferenceNotFound { .. })));
    Ok(())
}

#[tokio::test]
async fn test_refs_not_found_leaves_cache_untouched() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();
    let ctx = CallContext::background();
    mock.state
        .set_status(&mock.state.refs_status, StatusCode::NOT_FOUND);

    let result = provider.list_tree(&ctx, &yml(MAIN)).await;
    let err = result.expect_err("a 404 on refs must fail");
    assert!(matches!(err, Error::RepositoryNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(provider.cache().get_refs(REPO_URL).is_none());
    assert!(provider.cache().get_tree(REPO_URL, MAIN).is_none());

    // Once the repository shows up, the next call goes back to the remote.
    mock.state.set_status(&mock.state.refs_status, StatusCode::OK);
    provider.list_tree(&ctx, &yml(MAIN)).await?;
    assert_eq!(mock.state.hits(), (2, 1, 1));
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_on_any_endpoint() -> anyhow::Result<()> {
    for (slot, expected_hits) in [("refs", (1, 0, 0)), ("items", (1, 1, 0)), ("tree", (1, 1, 1))] {
        let mock = MockAzure::start().await;
        let state = &mock.state;
        let status = match slot {
            "refs" => &state.refs_status,
            "items" => &state.items_status,
            _ => &state.tree_status,
        };
        state.set_status(status, StatusCode::UNAUTHORIZED);

        let provider = mock.provider();
        let result = provider
            .list_tree(&CallContext::background(), &yml(MAIN))
            .await;

        match result {
            Err(e @ Error::AuthenticationFailure { .. }) => {
                assert_eq!(e.kind(), ErrorKind::Authentication, "{}", slot)
            }
            other => panic!("Expected AuthenticationFailure on {}, got {:?}", slot, other),
        }
        assert_eq!(state.hits(), expected_hits, "{}", slot);
        assert!(provider.cache().get_tree(REPO_URL, MAIN).is_none(), "{}", slot);
    }
    Ok(())
}

#[tokio::test]
async fn test_html_body_on_any_endpoint_is_a_decode_error() -> anyhow::Result<()> {
    for (endpoint, what, expected_hits) in [
        ("refs", "Azure refs", (1, 0, 0)),
        ("items", "Azure items", (1, 1, 0)),
        ("tree", "Azure tree", (1, 1, 1)),
    ] {
        let mock = MockAzure::start().await;
        mock.state.html_endpoints.lock().unwrap().push(endpoint);
        let provider = mock.provider();

        let result = provider
            .list_tree(&CallContext::background(), &yml(MAIN))
            .await;

        match result {
            Err(e @ Error::Decode { .. }) => {
                assert!(matches!(e, Error::Decode { what: w, .. } if w == what), "{}", endpoint);
                assert_eq!(e.kind(), ErrorKind::MalformedResponse, "{}", endpoint);
            }
            other => panic!("Expected Decode on {}, got {:?}", endpoint, other),
        }
        assert_eq!(mock.state.hits(), expected_hits, "{}", endpoint);
        assert!(provider.cache().get_tree(REPO_URL, MAIN).is_none(), "{}", endpoint);
        // Only a successfully decoded reference list is ever recorded.
        assert_eq!(
            provider.cache().get_refs(REPO_URL).is_some(),
            endpoint != "refs",
            "{}",
            endpoint
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_non_authoritative_answer_is_an_authentication_failure() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    mock.state.set_status(
        &mock.state.refs_status,
        StatusCode::NON_AUTHORITATIVE_INFORMATION,
    );

    let result = mock
        .provider()
        .list_remote(&CallContext::background(), &CloneOptions::new(REPO_URL))
        .await;
    assert!(matches!(result, Err(Error::AuthenticationFailure { .. })));
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_unexpected_status() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    mock.state
        .set_status(&mock.state.tree_status, StatusCode::INTERNAL_SERVER_ERROR);

    let result = mock
        .provider()
        .list_tree(&CallContext::background(), &yml(MAIN))
        .await;
    match result {
        Err(Error::UnexpectedStatus { step, status }) => {
            assert_eq!(step, "list tree");
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_root_item_is_incomplete_data() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    *mock.state.root_item.lock().unwrap() = None;

    let result = mock
        .provider()
        .list_tree(&CallContext::background(), &yml(MAIN))
        .await;

    assert!(matches!(result, Err(Error::IncompleteData(_))));
    assert_eq!(mock.state.hits(), (1, 1, 0));
    Ok(())
}

#[tokio::test]
async fn test_latest_commit_id() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = mock.provider();

    let commit = provider
        .latest_commit_id(&CallContext::background(), &FetchOptions::new(REPO_URL, MAIN))
        .await?;
    assert_eq!(commit, COMMIT_ID);

    // The commit query does not consult the reference list.
    assert_eq!(mock.state.hits(), (0, 1, 0));

    *mock.state.root_item.lock().unwrap() = Some((ROOT_OBJECT_ID.to_string(), String::new()));
    let result = provider
        .latest_commit_id(&CallContext::background(), &FetchOptions::new(REPO_URL, MAIN))
        .await;
    assert!(matches!(result, Err(Error::IncompleteData(_))));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_listings_agree() -> anyhow::Result<()> {
    let mock = MockAzure::start().await;
    let provider = Arc::new(mock.provider());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            provider
                .list_tree(&CallContext::background(), &yml(MAIN))
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await??, vec!["/docker-compose.yml", "/stacks/web.yml"]);
    }

    // No call-level locking: racing callers may each miss, but never more
    // than once per caller.
    let (refs, items, trees) = mock.state.hits();
    assert!((1..=8).contains(&refs));
    assert!((1..=8).contains(&items));
    assert!((1..=8).contains(&trees));
    Ok(())
}
