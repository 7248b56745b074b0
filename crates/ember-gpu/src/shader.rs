//! SPIR-V shader loading.

use std::fs::File;
use std::path::Path;

use crate::error::{GpuError, Result};

/// Load precompiled SPIR-V words from a file.
pub fn load_spirv(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .map_err(|e| GpuError::ShaderLoad(format!("{}: {e}", path.display())))?;

    ash::util::read_spv(&mut file)
        .map_err(|e| GpuError::ShaderLoad(format!("{}: {e}", path.display())))
}
