use crate::{cli::args::SessionArgs, utils::unwrap_path_or_home};
use alloy_chains::Chain;
use sigil_passkey::{Keystore, PasskeyServerClient, SoftwareAuthenticator};
use sigil_primitives::{chain::ChainExt, provider::create_http_provider};
use sigil_rpc::{BundlerClient, PaymasterClient};
use sigil_session::{
    KernelAccountFactory, Orchestrator, PasskeyCredentials, SessionConfig,
};
use std::sync::Arc;
use tracing::info;

/// Wires the passkey server, chain RPC, bundler and paymaster clients into an orchestrator
pub async fn launch_orchestrator(args: &SessionArgs) -> eyre::Result<Orchestrator> {
    let chain = Chain::from_id(args.services.chain_id);
    let timeout = args.services.request_timeout();

    let keystore_path = unwrap_path_or_home(args.authenticator.keystore.clone())?;
    let keystore = Keystore::open(&keystore_path.0)?;
    info!(
        "Loaded {} passkey(s) from {:?}",
        keystore.credentials().len(),
        keystore_path.0
    );
    let authenticator = Arc::new(SoftwareAuthenticator::new(
        args.authenticator.rp_id.clone(),
        args.authenticator.origin.clone(),
        keystore,
    ));
    let server =
        PasskeyServerClient::new(&args.services.passkey_server_url, authenticator, timeout)?;
    let credentials = PasskeyCredentials::new(
        server,
        args.account.validator,
        Some(args.authenticator.rp_id.clone()),
        chain.supports_p256_precompile(),
    );

    let eth_client = Arc::new(create_http_provider(args.services.eth_client_address()).await?);
    let accounts = KernelAccountFactory::new(
        eth_client,
        args.account.entry_point,
        args.account.kernel_factory,
        args.account.meta_factory,
        args.account.index,
    );

    let bundler = BundlerClient::new(&args.services.bundler_url, args.account.entry_point, timeout)?;
    let sponsor = PaymasterClient::new(
        &args.services.paymaster_url,
        chain.id(),
        args.account.entry_point,
        timeout,
    )?;

    info!(
        "Session on chain {chain} through bundler {} (entry point {:?})",
        args.services.bundler_url, args.account.entry_point
    );

    Ok(Orchestrator::new(
        Arc::new(credentials),
        Arc::new(accounts),
        Arc::new(bundler),
        Arc::new(sponsor),
        SessionConfig { chain, wait: args.wait.config() },
    ))
}
