//! Aligned storage for per-particle state vectors

use aligned_box::AlignedBox;

use crate::error::{Error, Result};

// For now we just enforce 32 byte alignment (enough for AVX2 and older)
const ALIGNMENT: usize = 32;

/// Flat f64 buffer backing one per-particle quantity (positions, forces)
pub(crate) struct StateBuffer {
    /// Raw storage as byte array
    data: AlignedBox<[u8]>,
}

impl StateBuffer {
    /// Allocate a zero-initialized buffer for `count` f64 components
    pub(crate) fn zeroed(count: usize) -> Result<Self> {
        let data = AlignedBox::slice_from_value(ALIGNMENT, count * std::mem::size_of::<f64>(), 0u8)
            .map_err(|e| Error::Allocation(e.to_string()))?;
        Ok(Self { data })
    }

    pub(crate) fn as_f64_slice(&self) -> &[f64] {
        bytemuck::cast_slice::<u8, f64>(&self.data)
    }

    pub(crate) fn as_f64_slice_mut(&mut self) -> &mut [f64] {
        bytemuck::cast_slice_mut::<u8, f64>(&mut self.data)
    }

    pub(crate) fn fill(&mut self, value: f64) {
        self.as_f64_slice_mut().fill(value);
    }

    /// Get allocated memory size in bytes
    pub(crate) fn get_memory_usage(&self) -> usize {
        self.data.len()
    }
}
