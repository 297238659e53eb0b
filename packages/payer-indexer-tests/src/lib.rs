pub mod fixtures;

pub mod assets {
    pub const PAYER_MANIFEST: &str = include_str!("./../assets/payer.manifest.yaml");
}

pub mod defaults {
    pub const PAYER_CONTRACT: &str = "0xd97bcd9f47cee35c0a9ec1dc40c1269afc9e8e1d";
    pub const START_BLOCK: u64 = 15_000_000;
    pub const BLOCK_TIMESTAMP: u64 = 1_656_000_000;
    /// Base units per whole token (6 decimals).
    pub const TOKEN_UNIT: u64 = 1_000_000;
}
