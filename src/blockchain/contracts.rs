//! Token contract bindings.
//!
//! Calldata for ERC-20 and ERC-721 calls, shared by the read-only RPC client
//! and the wallet transfer helpers.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Minimal ERC-20 surface.
    #[derive(Debug)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Minimal ERC-721 surface.
    #[derive(Debug)]
    interface IERC721 {
        function ownerOf(uint256 tokenId) external view returns (address);
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
    }
}

pub fn erc20_transfer(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

pub fn erc20_approve(spender: Address, amount: U256) -> Bytes {
    IERC20::approveCall { spender, amount }.abi_encode().into()
}

pub fn erc721_safe_transfer(from: Address, to: Address, token_id: U256) -> Bytes {
    IERC721::safeTransferFromCall {
        from,
        to,
        tokenId: token_id,
    }
    .abi_encode()
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        let to = Address::repeat_byte(0x11);
        assert_eq!(&erc20_transfer(to, U256::from(1))[..4], [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&erc20_approve(to, U256::from(1))[..4], [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(
            &erc721_safe_transfer(to, to, U256::from(7))[..4],
            [0x42, 0x84, 0x2e, 0x0e]
        );
    }

    #[test]
    fn test_transfer_calldata_layout() {
        let to = Address::repeat_byte(0x22);
        let data = erc20_transfer(to, U256::from(1_000u64));
        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[16..36], to.as_slice());
        assert_eq!(U256::from_be_slice(&data[36..68]), U256::from(1_000u64));
    }
}
