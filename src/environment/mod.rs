//! Environment variable validation.

mod credentials;
mod snapshot;
mod validator;

pub use credentials::{
    CREDENTIAL_VARIABLE, CredentialSlot, CredentialSlotSet, REQUIRED_CREDENTIAL_KEYS,
    parse_credential,
};
pub use snapshot::{EnvironmentSnapshot, NodeEnv};
pub use validator::{
    DISCORD_APPLICATION_ID, DISCORD_BOT_TOKEN, EnvironmentValidator, NODE_ENV, REQUIRED_VARIABLES,
    ValidatedEnvironment,
};
