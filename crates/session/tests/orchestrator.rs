mod common;

use common::{Harness, StubBundler, StubValidator, META_FACTORY, PAYMASTER};
use ethers::types::{Address, Bytes};
use sigil_contracts::TargetContract;
use sigil_primitives::{
    constants::{
        entry_point::ADDRESS as ENTRY_POINT,
        tutorial::{ABI, CONTRACT},
    },
    UserOperationHash,
};
use sigil_session::{Session, SessionError, SessionHandle, SessionState, Status};
use std::{sync::Arc, time::Duration};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

fn tutorial() -> TargetContract {
    TargetContract::new(CONTRACT.parse().unwrap(), ABI).unwrap()
}

fn op_hash() -> UserOperationHash {
    "0xabc0000000000000000000000000000000000000000000000000000000000001".parse().unwrap()
}

fn harness() -> Harness {
    Harness::new(|events| StubBundler::new(events, op_hash()))
}

#[tokio::test]
async fn register_creates_credential_then_binds_once() -> eyre::Result<()> {
    let harness = harness();
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();

    let address = orchestrator.register(&mut session, "alice").await?;

    assert_eq!(harness.events(), vec!["register", "build"]);
    assert!(session.is_ready());
    assert_eq!(session.address(), Some(address));
    assert_eq!(session.identity(), Some("alice"));
    assert_eq!(session.state(), SessionState::Bound);
    Ok(())
}

#[tokio::test]
async fn login_only_resolves() -> eyre::Result<()> {
    let harness = harness();
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();

    orchestrator.login(&mut session, None).await?;

    assert_eq!(harness.events(), vec!["resolve", "build"]);
    assert!(session.is_ready());
    assert_eq!(session.identity(), None);
    Ok(())
}

#[tokio::test]
async fn credential_failure_skips_binding() {
    let harness = harness();
    *harness.credentials.fail.lock() = Some(SessionError::Credential { inner: "denied".into() });
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();

    let err = orchestrator.register(&mut session, "alice").await.unwrap_err();
    assert_eq!(err, SessionError::Credential { inner: "denied".into() });
    assert_eq!(harness.events(), vec!["register"]);
    assert!(!session.is_ready());
    assert_eq!(session.state(), SessionState::NoSession);

    let err = orchestrator.login(&mut session, Some("alice")).await.unwrap_err();
    assert_eq!(err.class(), "passkey");
    assert_eq!(harness.events(), vec!["register", "resolve"]);
}

#[tokio::test]
async fn failed_binding_keeps_previous_account() -> eyre::Result<()> {
    let harness = harness();
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();

    let address = orchestrator.login(&mut session, Some("alice")).await?;
    *harness.accounts.fail.lock() =
        Some(SessionError::AccountBinding { inner: "header not found".into() });

    let err = orchestrator.register(&mut session, "bob").await.unwrap_err();
    assert_eq!(err.class(), "account");
    assert_eq!(session.address(), Some(address));
    assert_eq!(session.identity(), Some("alice"));
    Ok(())
}

#[tokio::test]
async fn same_validator_same_address() -> eyre::Result<()> {
    let harness = harness();
    let orchestrator = harness.orchestrator();
    let validator = Arc::new(StubValidator { address: Address::repeat_byte(0x42) });

    let first = orchestrator.bind(validator.clone()).await?;
    let second = orchestrator.bind(validator).await?;
    assert_eq!(first.address(), second.address());

    let other = Arc::new(StubValidator { address: Address::repeat_byte(0x43) });
    let other = orchestrator.bind(other).await?;
    assert_ne!(first.address(), other.address());
    Ok(())
}

#[tokio::test]
async fn alice_is_bound_to_her_account() -> eyre::Result<()> {
    let account = Address::repeat_byte(0x11);
    let harness = harness().with_account(account);
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();

    assert_eq!(orchestrator.register(&mut session, "alice").await?, account);
    assert!(session.is_ready());
    assert_eq!(session.address(), Some(account));
    Ok(())
}

#[tokio::test]
async fn submit_before_binding_is_not_ready() {
    let harness = harness();
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();

    let args = ["0x1111111111111111111111111111111111111111"];
    let err = orchestrator
        .submit(&mut session, &tutorial(), "mint", &args, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, SessionError::NotReady);
    assert!(harness.events().is_empty());
    assert_eq!(session.status(), Status::Idle);
}

#[tokio::test]
async fn mint_is_sponsored_signed_and_included() -> eyre::Result<()> {
    let account = Address::repeat_byte(0x11);
    let harness = harness().with_account(account);
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    orchestrator.register(&mut session, "alice").await?;
    harness.clear_events();

    let args = [format!("{account:?}")];
    let completion = orchestrator
        .submit(&mut session, &tutorial(), "mint", &args, &CancellationToken::new())
        .await?;

    assert_eq!(completion.hash, op_hash());
    assert_eq!(harness.events(), vec!["nonce", "gas_price", "sponsor", "sign", "send", "wait"]);

    let status = session.status().to_string();
    assert!(status.contains(&op_hash().to_string()));
    assert!(status.contains("network=sepolia"));
    assert!(!status.contains("Sending"));
    assert_eq!(session.state(), SessionState::Bound);

    let sent = harness.bundler.sent.lock().clone();
    assert_eq!(sent.len(), 1);
    let uo = &sent[0];
    assert_eq!(uo.sender, account);
    assert_eq!(&uo.call_data[..4], &[0x6a, 0x62, 0x78, 0x42]);
    assert_eq!(&uo.call_data[16..36], account.as_bytes());
    assert_eq!(uo.factory, Some(META_FACTORY));
    assert_eq!(uo.paymaster, Some(PAYMASTER));
    assert_eq!(uo.max_fee_per_gas, 2_000.into());
    assert_eq!(uo.call_gas_limit, 100_000.into());

    let entry_point: Address = ENTRY_POINT.parse()?;
    let hash = uo.hash(&entry_point, 11_155_111);
    assert_eq!(uo.signature, Bytes::from([hash.0.as_bytes(), &[0x1b][..]].concat()));
    Ok(())
}

#[tokio::test]
async fn status_shows_hash_only_after_inclusion() -> eyre::Result<()> {
    let harness = Harness::new(|events| StubBundler {
        release: Some(Notify::new()),
        ..StubBundler::new(events, op_hash())
    });
    let handle = SessionHandle::new(Arc::new(harness.orchestrator()), Session::new());
    let account = handle.register("alice").await?;
    assert_eq!(handle.address()?, Some(account));

    let submitting = handle.clone();
    let task = tokio::spawn(async move {
        let args = [format!("{account:?}")];
        submitting.submit(&tutorial(), "mint", &args, &CancellationToken::new()).await
    });

    harness.bundler.waiting.notified().await;
    assert_eq!(handle.status(), Status::Sending);
    assert_eq!(handle.status().to_string(), "Sending UserOp...");
    assert!(!handle.status().to_string().contains(&op_hash().to_string()));

    // a second action is rejected while the first one runs
    assert_eq!(handle.login(None).await.unwrap_err(), SessionError::Busy);
    assert_eq!(handle.address().unwrap_err(), SessionError::Busy);

    if let Some(release) = &harness.bundler.release {
        release.notify_one();
    }
    let completion = task.await??;

    let status = handle.status().to_string();
    assert!(status.starts_with("UserOp completed. Click here to view: "));
    assert!(status.contains(&completion.hash.to_string()));
    assert!(!status.contains("Sending"));
    assert_eq!(handle.address()?, Some(account));
    Ok(())
}

#[tokio::test]
async fn unknown_function_is_an_encoding_error() -> eyre::Result<()> {
    let harness = harness();
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    orchestrator.register(&mut session, "alice").await?;
    harness.clear_events();

    let err = orchestrator
        .submit(&mut session, &tutorial(), "burn", &["1"], &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.class(), "encoding");
    assert!(harness.events().is_empty());
    assert_eq!(session.status(), Status::Failed { error: err });
    Ok(())
}

#[tokio::test]
async fn sponsorship_rejection_is_not_submitted() -> eyre::Result<()> {
    let harness = harness()
        .with_sponsor_rejection(SessionError::Sponsorship { inner: "policy".into() });
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    orchestrator.register(&mut session, "alice").await?;

    let args = [format!("{:?}", session.address().unwrap_or_default())];
    let err = orchestrator
        .submit(&mut session, &tutorial(), "mint", &args, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.class(), "sponsorship");
    assert!(!harness.events().contains(&"send"));
    assert!(session.status().to_string().starts_with("UserOp failed (sponsorship)"));
    Ok(())
}

#[tokio::test]
async fn bundler_rejection() -> eyre::Result<()> {
    let harness = Harness::new(|events| StubBundler {
        reject: Some(SessionError::Submission { inner: "AA21 didn't pay prefund".into() }),
        ..StubBundler::new(events, op_hash())
    });
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    orchestrator.register(&mut session, "alice").await?;

    let args = [format!("{:?}", session.address().unwrap_or_default())];
    let err = orchestrator
        .submit(&mut session, &tutorial(), "mint", &args, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.class(), "submission");
    assert!(!harness.events().contains(&"wait"));
    assert_eq!(session.state(), SessionState::Bound);
    Ok(())
}

#[tokio::test]
async fn inclusion_timeout() -> eyre::Result<()> {
    let harness = Harness::new(|events| StubBundler {
        included: false,
        ..StubBundler::new(events, op_hash())
    });
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    orchestrator.register(&mut session, "alice").await?;

    let args = [format!("{:?}", session.address().unwrap_or_default())];
    let err = orchestrator
        .submit(&mut session, &tutorial(), "mint", &args, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::InclusionTimeout { hash, .. } if hash == op_hash()));
    assert!(!session.status().to_string().contains("completed"));
    Ok(())
}

#[tokio::test]
async fn cancelled_wait() -> eyre::Result<()> {
    let harness = Harness::new(|events| StubBundler {
        included: false,
        ..StubBundler::new(events, op_hash())
    });
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    orchestrator.register(&mut session, "alice").await?;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let args = [format!("{:?}", session.address().unwrap_or_default())];
    let err = orchestrator.submit(&mut session, &tutorial(), "mint", &args, &cancel).await.unwrap_err();

    assert_eq!(err, SessionError::Cancelled { hash: op_hash() });
    assert_eq!(session.status(), Status::Failed { error: err });
    Ok(())
}

#[tokio::test]
async fn dropped_submission_leaves_session_bound() -> eyre::Result<()> {
    let harness = Harness::new(|events| StubBundler {
        release: Some(Notify::new()),
        ..StubBundler::new(events, op_hash())
    });
    let orchestrator = harness.orchestrator();
    let mut session = Session::new();
    let account = orchestrator.register(&mut session, "alice").await?;

    let args = [format!("{account:?}")];
    let contract = tutorial();
    let cancel = CancellationToken::new();
    let submit = orchestrator.submit(&mut session, &contract, "mint", &args, &cancel);
    let res = tokio::time::timeout(Duration::from_millis(50), submit).await;
    assert!(res.is_err());

    assert_eq!(session.state(), SessionState::Bound);
    assert_eq!(session.status(), Status::Idle);
    assert!(!session.status().to_string().contains("Sending"));
    assert_eq!(session.address(), Some(account));
    Ok(())
}
