//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Extension Loader
//!
//! Loading is split across two traits so that a host can supply its own
//! module mechanism:
//!
//! - [`BfModuleLoader`] finds and loads a module by name, given an explicit
//!   [`BfSearchPath`].
//! - [`BfExtension`] is the loaded module; the bootstrapper only ever calls
//!   parameterless entry points on it.
//!
//! [`BfNativeLoader`] is the stock implementation on top of `libloading`.
//! Entry points use the C ABI and return a status code, zero on success:
//!
//! ```ignore
//! #[no_mangle]
//! pub extern "C" fn initHooks() -> std::os::raw::c_int {
//!     0
//! }
//! ```

use std::ffi::CString;
use std::fmt;
use std::os::raw::c_int;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::errors::{BfError, Result};
use crate::search_path::BfSearchPath;

/// Signature of every entry point the bootstrapper calls.
pub type BfEntryFn = unsafe extern "C" fn() -> c_int;

/// A loaded extension module.
pub trait BfExtension: fmt::Debug {
    fn name(&self) -> &str;

    /// Where the module was loaded from, when it came from a file.
    fn path(&self) -> Option<&Path>;

    /// Calls a parameterless entry point by name.
    fn call_entry(&self, symbol: &str) -> Result<()>;
}

/// The host's module loading mechanism.
pub trait BfModuleLoader {
    fn load(&mut self, module: &str, search_path: &BfSearchPath) -> Result<Box<dyn BfExtension>>;
}

/// Loads native libraries with `libloading`.
#[derive(Debug, Default)]
pub struct BfNativeLoader;

impl BfNativeLoader {
    pub fn new() -> Self {
        BfNativeLoader
    }
}

impl BfModuleLoader for BfNativeLoader {
    fn load(&mut self, module: &str, search_path: &BfSearchPath) -> Result<Box<dyn BfExtension>> {
        let path = search_path.resolve(module).ok_or_else(|| {
            let tried = search_path
                .candidates(module)
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>();
            BfError::load(module, format!("not found, tried {:?}", tried))
        })?;
        let extension = BfNativeExtension::open(module, path)?;
        Ok(Box::new(extension))
    }
}

/// A native library kept loaded for as long as the value lives.
pub struct BfNativeExtension {
    name: String,
    path: PathBuf,
    library: Library,
}

impl BfNativeExtension {
    pub fn open(name: &str, path: PathBuf) -> Result<Self> {
        // Safety: loading runs the library's initializers. The library is
        // the extension the host asked for, found on its own search path.
        let library = unsafe { Library::new(&path) }.map_err(|err| {
            BfError::load(name, format!("failed to load '{}': {}", path.display(), err))
        })?;
        log::info!(
            "boot.load.opened: native library loaded - module={}, path={}",
            name,
            path.display()
        );
        Ok(BfNativeExtension {
            name: name.to_string(),
            path,
            library,
        })
    }
}

impl BfExtension for BfNativeExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn call_entry(&self, symbol: &str) -> Result<()> {
        let c_name = CString::new(symbol)
            .map_err(|_| BfError::symbol(&self.name, symbol, "symbol name contains a NUL byte"))?;

        // Safety: entry points are declared `extern "C" fn() -> c_int` by
        // the extension contract.
        let status = unsafe {
            let entry: Symbol<BfEntryFn> = self
                .library
                .get(c_name.as_bytes_with_nul())
                .map_err(|err| BfError::symbol(&self.name, symbol, err.to_string()))?;
            entry()
        };

        if status != 0 {
            return Err(BfError::Init {
                module: self.name.clone(),
                symbol: symbol.to_string(),
                status,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for BfNativeExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BfNativeExtension")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}
