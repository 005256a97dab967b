//! Remote-verified proxy policy for CAS-style servers: ask an HTTP authority whether a
//! proxy-granting callback URL may receive tickets, and fail closed on everything else.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod authorizer;
pub mod error;
pub mod http;
pub mod obs;
pub mod policy;
pub mod service;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as BlockingClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
