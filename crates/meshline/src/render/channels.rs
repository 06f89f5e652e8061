//! GPU mirrors of geometry channels.
//!
//! Each mirror remembers the element count and version it last uploaded so the
//! renderer only touches buffers that changed, and only reallocates when the
//! count changes.

/// What to do with a channel before drawing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Upload {
    /// Up to date.
    Skip,
    /// Same size, new contents: overwrite in place.
    Write,
    /// Size changed (or never uploaded): allocate a new buffer.
    Realloc,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct Uploaded {
    pub len: usize,
    pub version: u64,
}

pub(super) fn plan_upload(uploaded: Option<Uploaded>, len: usize, version: u64) -> Upload {
    match uploaded {
        Some(u) if u.len == len && u.version == version => Upload::Skip,
        Some(u) if u.len == len => Upload::Write,
        _ => Upload::Realloc,
    }
}

/// One GPU buffer plus what was last uploaded into it.
#[derive(Debug, Default)]
pub(super) struct ChannelBuffer {
    pub buffer: Option<wgpu::Buffer>,
    uploaded: Option<Uploaded>,
}

impl ChannelBuffer {
    /// Element count of the last upload.
    #[inline]
    pub fn len(&self) -> usize {
        self.uploaded.map_or(0, |u| u.len)
    }

    /// Brings the buffer in line with `data`. Returns `true` when a new buffer was
    /// allocated.
    pub fn sync<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        usage: wgpu::BufferUsages,
        data: &[T],
        version: u64,
    ) -> bool {
        use wgpu::util::DeviceExt;

        let uploaded = self.buffer.as_ref().and(self.uploaded);
        match plan_upload(uploaded, data.len(), version) {
            Upload::Skip => false,
            Upload::Write => {
                if let Some(buffer) = self.buffer.as_ref() {
                    queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
                }
                self.uploaded = Some(Uploaded { len: data.len(), version });
                false
            }
            Upload::Realloc => {
                log::debug!("meshline: allocating {label} ({} elements)", data.len());
                self.buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(data),
                    usage: usage | wgpu::BufferUsages::COPY_DST,
                }));
                self.uploaded = Some(Uploaded { len: data.len(), version });
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT_12_V1: Option<Uploaded> = Some(Uploaded { len: 12, version: 1 });

    #[test]
    fn never_uploaded_reallocates() {
        assert_eq!(plan_upload(None, 12, 0), Upload::Realloc);
    }

    #[test]
    fn unchanged_is_skipped() {
        assert_eq!(plan_upload(AT_12_V1, 12, 1), Upload::Skip);
    }

    #[test]
    fn new_version_same_len_writes_in_place() {
        assert_eq!(plan_upload(AT_12_V1, 12, 2), Upload::Write);
    }

    #[test]
    fn len_change_reallocates() {
        assert_eq!(plan_upload(AT_12_V1, 18, 1), Upload::Realloc);
        assert_eq!(plan_upload(AT_12_V1, 18, 0), Upload::Realloc);
    }
}
