//! # Buffer State Module
//!
//! A registry of named GPU buffers. Buffers are created once and written every
//! frame; a write larger than the buffer replaces it with a bigger one, which is
//! how the per-block instance buffer keeps up with a growing world.
//!
//! Allocated and used sizes are tracked per buffer and logged when they change.

use std::collections::HashMap;

use log::debug;
use wgpu::{util::DeviceExt, Buffer, BufferUsages, Device, Queue};

/// Allocation bookkeeping for one buffer.
#[derive(Debug, Clone, Copy)]
struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    allocated_memory: u64,
    /// Bytes written by the most recent write
    used_memory: u64,
    /// Number of times the buffer has been written to
    times_written: u64,
}

/// Central manager for the renderer's GPU buffers.
///
/// # Examples
///
/// ```ignore
/// let mut buffer_state = BufferState::new(device, queue);
///
/// buffer_state.create_buffer_init(
///     "cube vertices",
///     wgpu::util::BufferInitDescriptor {
///         label: Some("Cube Vertex Buffer"),
///         contents: bytemuck::cast_slice(&vertices),
///         usage: wgpu::BufferUsages::VERTEX,
///     },
/// );
///
/// let vertex_buffer = buffer_state.get_buffer("cube vertices");
/// ```
pub struct BufferState {
    device: Device,
    queue: Queue,
    buffers: HashMap<&'static str, Buffer>,
    usages: HashMap<&'static str, BufferUsages>,
    buffer_analytics: HashMap<&'static str, BufferAnalytics>,
}

impl BufferState {
    pub fn new(device: Device, queue: Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            usages: HashMap::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// Creates a buffer filled with `init_descriptor.contents`.
    ///
    /// Replaces any buffer registered under the same name.
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let size = init_descriptor.contents.len() as u64;
        let buffer = self.device.create_buffer_init(&init_descriptor);

        self.buffers.insert(buffer_name, buffer);
        self.usages.insert(buffer_name, init_descriptor.usage);
        self.buffer_analytics.insert(
            buffer_name,
            BufferAnalytics {
                allocated_memory: size,
                used_memory: size,
                times_written: 1,
            },
        );
    }

    /// Registers a buffer created elsewhere, such as one a bind group was built
    /// from before registration.
    pub fn insert_buffer(
        &mut self,
        buffer_name: &'static str,
        buffer: Buffer,
        size: u64,
        usage: BufferUsages,
    ) {
        self.buffers.insert(buffer_name, buffer);
        self.usages.insert(buffer_name, usage);
        self.buffer_analytics.insert(
            buffer_name,
            BufferAnalytics {
                allocated_memory: size,
                used_memory: size,
                times_written: 1,
            },
        );
    }

    /// Writes `data` at the start of the named buffer.
    ///
    /// When the data does not fit, the buffer is reallocated with room to grow
    /// and the data is uploaded into the new buffer. Buffers that need to be
    /// written must be created with `COPY_DST`.
    ///
    /// # Returns
    /// `true` if the buffer was reallocated, so anything holding the old buffer
    /// (such as a bind group) must be rebuilt. Writes to unknown buffers are
    /// logged and ignored.
    pub fn write_buffer(&mut self, buffer_name: &'static str, data: &[u8]) -> bool {
        let Some(analytics) = self.buffer_analytics.get_mut(buffer_name) else {
            log::error!("Write to unknown buffer '{buffer_name}' ignored");
            return false;
        };

        let data_size = data.len() as u64;
        let reallocated = if data_size > analytics.allocated_memory {
            let usage = self
                .usages
                .get(buffer_name)
                .copied()
                .unwrap_or(BufferUsages::COPY_DST);
            let new_size = grown_capacity(analytics.allocated_memory, data_size);
            debug!(
                "Growing buffer '{buffer_name}' from {} to {new_size} bytes",
                analytics.allocated_memory
            );

            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(buffer_name),
                size: new_size,
                usage,
                mapped_at_creation: false,
            });
            self.buffers.insert(buffer_name, buffer);
            analytics.allocated_memory = new_size;
            true
        } else {
            false
        };

        if let Some(buffer) = self.buffers.get(buffer_name) {
            if !data.is_empty() {
                self.queue.write_buffer(buffer, 0, data);
            }
        }
        analytics.used_memory = data_size;
        analytics.times_written += 1;

        if reallocated {
            debug!(
                "Buffers now hold {} bytes ({} in use)",
                self.get_total_allocated_memory(),
                self.get_total_used_memory()
            );
        }
        reallocated
    }

    pub fn get_buffer(&self, buffer_name: &'static str) -> Option<&Buffer> {
        self.buffers.get(buffer_name)
    }

    /// Gets the total allocated memory across all buffers, in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .map(|analytics| analytics.allocated_memory)
            .sum()
    }

    /// Gets the memory written by the latest write of every buffer, in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .map(|analytics| analytics.used_memory)
            .sum()
    }
}

/// Size for a buffer that must hold `needed` bytes, doubling from `current`.
///
/// Sizes stay multiples of `wgpu::COPY_BUFFER_ALIGNMENT`.
pub fn grown_capacity(current: u64, needed: u64) -> u64 {
    let mut capacity = current.max(wgpu::COPY_BUFFER_ALIGNMENT);
    while capacity < needed {
        capacity *= 2;
    }
    capacity.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_doubles_until_the_data_fits() {
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(64, 300), 512);
        assert_eq!(grown_capacity(64, 64), 64);
    }

    #[test]
    fn capacity_grows_from_an_empty_buffer() {
        let grown = grown_capacity(0, 10);
        assert!(grown >= 10);
        assert_eq!(grown % wgpu::COPY_BUFFER_ALIGNMENT, 0);
    }
}
