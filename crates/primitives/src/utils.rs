//! Misc utils

use ethers::{
    types::{Address, Bytes, U128, U256},
    utils::to_checksum,
};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Converts Option address to checksum
pub fn as_checksum_addr_opt<S>(val: &Option<Address>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if let Some(addr) = val {
        s.serialize_str(&to_checksum(addr, None))
    } else {
        s.serialize_none()
    }
}

/// If possible, parses address from the first 20 bytes
pub fn get_address(buf: &[u8]) -> Option<Address> {
    if buf.len() >= 20 {
        Some(Address::from_slice(&buf[0..20]))
    } else {
        None
    }
}

pub fn pack_paymaster_data(
    addr: Address,
    paymaster_verification_gas_limit: U256,
    paymaster_post_op_gas_limit: U256,
    paymaster_data: &Bytes,
) -> Vec<u8> {
    let gas_data = pack_uint128(paymaster_verification_gas_limit, paymaster_post_op_gas_limit);
    [addr.0.as_slice(), gas_data.as_slice(), &paymaster_data[..]].concat()
}

pub fn pack_factory_data(factory: Address, factory_data: Bytes) -> Vec<u8> {
    [factory.0.as_slice(), &factory_data[..]].concat()
}

/// Packs two uint128 (upper 128 bits of each value are dropped)
pub fn pack_uint128(a: U256, b: U256) -> [u8; 32] {
    let mut res = [0u8; 32];
    low_u128(a).to_big_endian(&mut res[0..16]);
    low_u128(b).to_big_endian(&mut res[16..32]);
    res
}

fn low_u128(val: U256) -> U128 {
    let mut buf = [0u8; 32];
    val.to_big_endian(&mut buf);
    U128::from_big_endian(&buf[16..32])
}

/// Unpacks two uint128 from bytes
pub fn unpack_uint128(buf: &[u8; 32]) -> (U256, U256) {
    (U256::from_big_endian(&buf[0..16]), U256::from_big_endian(&buf[16..32]))
}
