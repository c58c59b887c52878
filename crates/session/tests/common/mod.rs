use async_trait::async_trait;
use ethers::{
    types::{Address, Bytes, H256, U256},
    utils::keccak256,
};
use parking_lot::Mutex;
use sigil_primitives::{
    Call, GasPriceTier, SponsorUserOperationResult, UserOperationGasPrice, UserOperationHash,
    UserOperationReceipt, UserOperationSigned,
};
use sigil_session::{
    traits::{AccountFactory, Bundler, CredentialService, SmartAccount, Sponsor, Validator},
    wait_for_receipt, Orchestrator, SessionConfig, SessionError, SessionResult, WaitConfig,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// External calls in the order they were made
pub type Events = Arc<Mutex<Vec<&'static str>>>;

pub const META_FACTORY: Address = Address::repeat_byte(0xfa);
pub const PAYMASTER: Address = Address::repeat_byte(0x22);

pub struct StubValidator {
    pub address: Address,
}

#[async_trait]
impl Validator for StubValidator {
    fn address(&self) -> Address {
        self.address
    }

    fn enable_data(&self) -> Bytes {
        Bytes::from(self.address.as_bytes().to_vec())
    }

    fn dummy_signature(&self) -> Bytes {
        Bytes::from(vec![0xee; 65])
    }

    async fn sign_hash(&self, hash: H256) -> SessionResult<Bytes> {
        Ok(Bytes::from([hash.as_bytes(), &[0x1b][..]].concat()))
    }
}

pub struct StubCredentials {
    pub events: Events,
    pub validator: Address,
    pub fail: Mutex<Option<SessionError>>,
}

#[async_trait]
impl CredentialService for StubCredentials {
    async fn register(&self, _label: &str) -> SessionResult<Arc<dyn Validator>> {
        self.events.lock().push("register");
        if let Some(err) = self.fail.lock().clone() {
            return Err(err);
        }
        Ok(Arc::new(StubValidator { address: self.validator }))
    }

    async fn resolve(&self) -> SessionResult<Arc<dyn Validator>> {
        self.events.lock().push("resolve");
        if let Some(err) = self.fail.lock().clone() {
            return Err(err);
        }
        Ok(Arc::new(StubValidator { address: self.validator }))
    }
}

pub struct StubAccounts {
    pub events: Events,
    /// Address of every account, derived from the validator when unset
    pub fixed: Option<Address>,
    pub fail: Mutex<Option<SessionError>>,
}

#[async_trait]
impl AccountFactory for StubAccounts {
    async fn build(&self, validator: Arc<dyn Validator>) -> SessionResult<Arc<dyn SmartAccount>> {
        self.events.lock().push("build");
        if let Some(err) = self.fail.lock().clone() {
            return Err(err);
        }
        let address = self.fixed.unwrap_or_else(|| {
            Address::from_slice(&keccak256(validator.address().as_bytes())[12..])
        });
        Ok(Arc::new(StubAccount { address, validator, events: self.events.clone() }))
    }
}

pub struct StubAccount {
    pub address: Address,
    pub validator: Arc<dyn Validator>,
    pub events: Events,
}

#[async_trait]
impl SmartAccount for StubAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn encode_calls(&self, calls: &[Call]) -> Bytes {
        Bytes::from(calls.iter().flat_map(|c| c.data.to_vec()).collect::<Vec<u8>>())
    }

    async fn nonce(&self) -> SessionResult<U256> {
        self.events.lock().push("nonce");
        Ok(U256::zero())
    }

    async fn factory_args(&self) -> SessionResult<Option<(Address, Bytes)>> {
        Ok(Some((META_FACTORY, Bytes::from(vec![0xc5, 0x26, 0x5d, 0x5d]))))
    }

    fn dummy_signature(&self) -> Bytes {
        self.validator.dummy_signature()
    }

    async fn sign_user_operation_hash(&self, hash: UserOperationHash) -> SessionResult<Bytes> {
        self.events.lock().push("sign");
        self.validator.sign_hash(hash.0).await
    }
}

pub struct StubBundler {
    pub events: Events,
    pub hash: UserOperationHash,
    pub included: bool,
    pub reject: Option<SessionError>,
    pub sent: Mutex<Vec<UserOperationSigned>>,
    /// Notified when the inclusion wait starts
    pub waiting: Notify,
    /// When set, the inclusion wait only polls once notified
    pub release: Option<Notify>,
}

impl StubBundler {
    pub fn new(events: Events, hash: UserOperationHash) -> Self {
        Self {
            events,
            hash,
            included: true,
            reject: None,
            sent: Mutex::new(vec![]),
            waiting: Notify::new(),
            release: None,
        }
    }
}

#[async_trait]
impl Bundler for StubBundler {
    fn entry_point(&self) -> Address {
        sigil_primitives::constants::entry_point::ADDRESS.parse().unwrap()
    }

    async fn send_user_operation(
        &self,
        user_operation: &UserOperationSigned,
    ) -> SessionResult<UserOperationHash> {
        self.events.lock().push("send");
        if let Some(err) = &self.reject {
            return Err(err.clone());
        }
        self.sent.lock().push(user_operation.clone());
        Ok(self.hash)
    }

    async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> SessionResult<Option<UserOperationReceipt>> {
        Ok((self.included && *hash == self.hash).then(|| UserOperationReceipt {
            user_operation_hash: *hash,
            success: true,
            ..Default::default()
        }))
    }

    async fn user_operation_gas_price(&self) -> SessionResult<UserOperationGasPrice> {
        self.events.lock().push("gas_price");
        let tier = |fee: u64| GasPriceTier {
            max_fee_per_gas: fee.into(),
            max_priority_fee_per_gas: (fee / 10).into(),
        };
        Ok(UserOperationGasPrice { slow: tier(1_000), standard: tier(2_000), fast: tier(3_000) })
    }

    async fn wait_for_inclusion(
        &self,
        hash: UserOperationHash,
        config: &WaitConfig,
        cancel: &CancellationToken,
    ) -> SessionResult<UserOperationReceipt> {
        self.events.lock().push("wait");
        self.waiting.notify_one();
        if let Some(release) = &self.release {
            release.notified().await;
        }
        wait_for_receipt(self, hash, config, cancel).await
    }
}

pub struct StubSponsor {
    pub events: Events,
    pub reject: Option<SessionError>,
}

#[async_trait]
impl Sponsor for StubSponsor {
    async fn sponsor(
        &self,
        user_operation: &UserOperationSigned,
        _entry_point: Address,
        chain_id: u64,
    ) -> SessionResult<SponsorUserOperationResult> {
        self.events.lock().push("sponsor");
        assert_eq!(chain_id, 11_155_111);
        assert_eq!(user_operation.signature, Bytes::from(vec![0xee; 65]));
        if let Some(err) = &self.reject {
            return Err(err.clone());
        }
        Ok(SponsorUserOperationResult {
            paymaster: PAYMASTER,
            paymaster_data: Bytes::from(vec![0x01, 0x02]),
            paymaster_verification_gas_limit: 30_000.into(),
            paymaster_post_op_gas_limit: 10_000.into(),
            call_gas_limit: 100_000.into(),
            verification_gas_limit: 200_000.into(),
            pre_verification_gas: 50_000.into(),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        })
    }
}

/// Orchestrator over stubs, with handles on each stub
pub struct Harness {
    pub events: Events,
    pub credentials: Arc<StubCredentials>,
    pub accounts: Arc<StubAccounts>,
    pub bundler: Arc<StubBundler>,
    pub sponsor: Arc<StubSponsor>,
}

impl Harness {
    pub fn new(bundler: impl FnOnce(Events) -> StubBundler) -> Self {
        let events = Events::default();
        Self {
            credentials: Arc::new(StubCredentials {
                events: events.clone(),
                validator: Address::repeat_byte(0x7a),
                fail: Mutex::new(None),
            }),
            accounts: Arc::new(StubAccounts {
                events: events.clone(),
                fixed: None,
                fail: Mutex::new(None),
            }),
            bundler: Arc::new(bundler(events.clone())),
            sponsor: Arc::new(StubSponsor { events: events.clone(), reject: None }),
            events,
        }
    }

    pub fn with_account(mut self, address: Address) -> Self {
        self.accounts = Arc::new(StubAccounts {
            events: self.events.clone(),
            fixed: Some(address),
            fail: Mutex::new(None),
        });
        self
    }

    pub fn with_sponsor_rejection(mut self, err: SessionError) -> Self {
        self.sponsor = Arc::new(StubSponsor { events: self.events.clone(), reject: Some(err) });
        self
    }

    pub fn orchestrator(&self) -> Orchestrator {
        let config = SessionConfig {
            wait: WaitConfig {
                timeout: Duration::from_millis(200),
                poll_interval: Duration::from_millis(10),
            },
            ..Default::default()
        };
        Orchestrator::new(
            self.credentials.clone(),
            self.accounts.clone(),
            self.bundler.clone(),
            self.sponsor.clone(),
            config,
        )
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }
}
