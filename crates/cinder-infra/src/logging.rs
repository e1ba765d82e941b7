// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging setup for applications embedding Cinder.

use env_logger::{Builder, Env};

/// The filter used when neither the caller nor `RUST_LOG` provides one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initializes the global logger.
///
/// `RUST_LOG` takes precedence over `filter`. Calling this more than once is
/// harmless: later calls leave the first logger in place.
/// ## Arguments
/// * `filter` - An `env_logger` filter string such as `"info"` or `"cinder_lanes=debug"`.
/// ## Returns
/// `true` if this call installed the logger.
pub fn init(filter: &str) -> bool {
    let installed = Builder::from_env(Env::default().default_filter_or(filter))
        .try_init()
        .is_ok();
    if installed {
        log::debug!("Logging: Initialized with default filter '{filter}'");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_no_op() {
        init(DEFAULT_LOG_FILTER);
        assert!(!init("debug"));
    }
}
