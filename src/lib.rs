//! Resolve a canonical user identity (subject, display name, verified primary email) from an
//! OAuth 2.0 access token by orchestrating a provider's profile and emails endpoints.
//!
//! The crate centers on [`resolver::Resolver`], a stateless two-stage pipeline built on the
//! generic JSON fetcher in [`http`]. Providers plug in through
//! [`provider::ProviderAdapter`] (wire shapes + canonical mapping) and
//! [`provider::ProviderDescriptor`] (endpoint bases); a Bitbucket Cloud adapter ships in the
//! box. Every failure surfaces as one of the kinds in [`error::Error`] so callers can tell a
//! network fault from a bad status, a non-JSON payload, or a malformed body.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod http;
pub mod identity;
pub mod obs;
pub mod provider;
pub mod resolver;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
