//! Hard-coded ABIs for the token factory and the two child-token standards.
//!
//! Declared with alloy's `sol!` macro against inline interface text — there
//! is no external ABI artifact in this scope, so the minimum surface the
//! gateway needs is spelled out directly, matching spec §4.2's ABI summary
//! exactly (no extra functions, no extra events).

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface ITokenFactory {
        function tokenCount() external view returns (uint256);

        function getTokenInfo(uint256 id)
            external
            view
            returns (
                uint8 kindTag,
                address tokenAddress,
                address owner,
                string memory name,
                string memory symbol,
                string memory metadataURI,
                uint256 createdAt,
                bool burnable,
                bool pausable,
                bool listedOnDex
            );

        function getOwnerTokens(address owner) external view returns (uint256[] memory);

        function getTokenIdByAddress(address tokenAddress) external view returns (uint256);

        function createERC20(
            string memory name,
            string memory symbol,
            uint256 supply,
            string memory metadataURI,
            bool burnable,
            bool pausable,
            bool listOnDex
        ) external returns (uint256);

        function createERC721(
            string memory name,
            string memory symbol,
            string memory baseURI,
            bool burnable
        ) external returns (uint256);

        function updateMetadataURI(uint256 id, string memory uri) external;

        function listOnETCSwap(uint256 id) external;

        event TokenCreated(
            uint256 indexed id,
            uint8 kindTag,
            address indexed tokenAddress,
            address indexed owner,
            string name,
            string symbol,
            string metadataURI
        );

        event TokenListedOnETCSwap(uint256 indexed id, address tokenAddress);

        event MetadataURIUpdated(uint256 indexed id, string uri);
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IFungibleToken {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function mint(address to, uint256 amount) external;
        function burn(uint256 amount) external;
        function pause() external;
        function unpause() external;
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface INonFungibleToken {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function balanceOf(address owner) external view returns (uint256);
        function transferFrom(address from, address to, uint256 tokenId) external;
        function mint(address to, string memory uri) external returns (uint256);
        function burn(uint256 tokenId) external;
    }
}
