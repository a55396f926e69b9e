use florin_bigint::{Address, H256};
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

/// Keccak-256, the chain's content digest.
pub fn keccak256(data: &[u8]) -> H256 {
	let mut out = [0u8; 32];
	out.copy_from_slice(Keccak256::digest(data).as_slice());
	H256::from(out)
}

/// Address of a contract deployed by `sender` at `nonce`: the low 20
/// bytes of `keccak256(rlp([sender, nonce]))`.
pub fn derive_create_address(sender: Address, nonce: u64) -> Address {
	let mut stream = RlpStream::new_list(2);
	stream.append(&sender.as_bytes());
	stream.append(&nonce);
	Address::from(keccak256(&stream.out()))
}
