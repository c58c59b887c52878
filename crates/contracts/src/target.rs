//! Target contract called by the smart account, described by a human-readable ABI

use crate::error::ContractError;
use ethers::{
    abi::{
        parse_abi,
        token::{LenientTokenizer, Tokenizer},
        Abi, Token,
    },
    types::{Address, Bytes},
};
use sigil_primitives::Call;
use tracing::trace;

#[derive(Clone, Debug)]
pub struct TargetContract {
    address: Address,
    abi: Abi,
}

impl TargetContract {
    /// Parses human-readable signatures such as `function mint(address _to) public`
    pub fn new<S: AsRef<str>>(address: Address, signatures: &[S]) -> Result<Self, ContractError> {
        let signatures = signatures.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
        let abi = parse_abi(&signatures).map_err(|e| ContractError::ABI { inner: e.to_string() })?;
        Ok(Self { address, abi })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Encodes a call to `function` with string arguments converted to the parameter types
    ///
    /// Overloaded functions resolve to the first overload whose arity matches the arguments.
    pub fn encode<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<Bytes, ContractError> {
        let overloads = self
            .abi
            .functions_by_name(function)
            .map_err(|_| ContractError::UnknownFunction { name: function.into() })?;
        let func = overloads
            .iter()
            .find(|f| f.inputs.len() == args.len())
            .or_else(|| overloads.first())
            .ok_or_else(|| ContractError::UnknownFunction { name: function.into() })?;

        if func.inputs.len() != args.len() {
            return Err(ContractError::ArgumentCount {
                function: function.into(),
                expected: func.inputs.len(),
                got: args.len(),
            });
        }

        let tokens = func
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, value))| {
                LenientTokenizer::tokenize(&param.kind, value.as_ref()).map_err(|e| {
                    ContractError::InvalidArgument {
                        index,
                        value: value.as_ref().into(),
                        kind: param.kind.to_string(),
                        inner: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<Token>, _>>()?;

        let data = func
            .encode_input(&tokens)
            .map_err(|e| ContractError::ABI { inner: e.to_string() })?;
        trace!("Encoded {}({:?}) for {:?}", function, tokens, self.address);

        Ok(data.into())
    }

    /// Builds the call executed by the smart account
    pub fn call<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<Call, ContractError> {
        Ok(Call::new(self.address, self.encode(function, args)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_primitives::constants::tutorial::{ABI, CONTRACT};

    fn tutorial() -> TargetContract {
        TargetContract::new(CONTRACT.parse().unwrap(), ABI).unwrap()
    }

    #[test]
    fn encode_mint() {
        let to = "0x1111111111111111111111111111111111111111";
        let call = tutorial().call("mint", &[to]).unwrap();

        assert_eq!(call.to, CONTRACT.parse::<Address>().unwrap());
        assert_eq!(call.data.len(), 36);
        assert_eq!(&call.data[..4], &[0x6a, 0x62, 0x78, 0x42]);
        assert_eq!(&call.data[16..36], &[0x11u8; 20]);
    }

    #[test]
    fn unknown_function() {
        let err = tutorial().encode("burn", &["1"]).unwrap_err();
        assert_eq!(err, ContractError::UnknownFunction { name: "burn".into() });
    }

    #[test]
    fn malformed_argument() {
        let err = tutorial().encode("mint", &["not-an-address"]).unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { index: 0, .. }));
    }

    #[test]
    fn wrong_argument_count() {
        let err = tutorial().encode::<&str>("mint", &[]).unwrap_err();
        assert_eq!(
            err,
            ContractError::ArgumentCount { function: "mint".into(), expected: 1, got: 0 }
        );
    }

    #[test]
    fn invalid_abi() {
        assert!(TargetContract::new(Address::zero(), &["function ("]).is_err());
    }
}
