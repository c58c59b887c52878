use ethers::contract::abigen;

abigen!(
    EntryPointAPI,
    r#"[
        function getNonce(address sender, uint192 key) public view returns (uint256 nonce)
        error FailedOp(uint256 opIndex, string reason)
        error FailedOpWithRevert(uint256 opIndex, string reason, bytes inner)
    ]"#
);

abigen!(
    KernelAPI,
    r#"[
        function initialize(bytes21 rootValidator, address hook, bytes validatorData, bytes hookData, bytes[] initConfig) external
        function execute(bytes32 execMode, bytes executionCalldata) external payable
    ]"#
);

abigen!(
    KernelFactoryAPI,
    r#"[
        function getAddress(bytes data, bytes32 salt) external view returns (address)
    ]"#
);

abigen!(
    FactoryStakerAPI,
    r#"[
        function deployWithFactory(address factory, bytes createData, bytes32 salt) external payable returns (address)
    ]"#
);
