//! Solidity ABI surface of the contracts the library talks to.
//!
//! Calls are encoded and decoded through these generated types only, so a mismatched
//! parameter list is a compile error rather than a revert.

use alloy_sol_types::sol;

sol! {
    /// Safe v1.3.0 / v1.4.1 wallet.
    interface ISafe {
        function setup(
            address[] _owners,
            uint256 _threshold,
            address to,
            bytes data,
            address fallbackHandler,
            address paymentToken,
            uint256 payment,
            address paymentReceiver
        ) external;
        function getOwners() external view returns (address[]);
        function getThreshold() external view returns (uint256);
        function isOwner(address owner) external view returns (bool);
        function nonce() external view returns (uint256);
        function execTransaction(
            address to,
            uint256 value,
            bytes data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            bytes signatures
        ) external payable returns (bool);
    }

    /// Safe proxy factory.
    interface ISafeProxyFactory {
        function createProxyWithNonce(address _singleton, bytes initializer, uint256 saltNonce)
            external
            returns (address);
        function proxyCreationCode() external pure returns (bytes);
    }

    /// Minimal ERC-20 read surface.
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}
