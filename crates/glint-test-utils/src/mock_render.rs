//! Mock implementations of [`RenderContext`] and [`QuadPass`] for testing.
//!
//! These record operations without touching a GPU.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::gpu_types::GpuTexture;
use crate::quad_pass::{BlendMode, QuadPass, TexturedQuad};
use crate::render_context::{RenderContext, TextureRegion};
use parking_lot::Mutex;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone)]
pub enum RenderCall {
    CreateTexture {
        texture_id: usize,
        width: u32,
        height: u32,
        format: TextureFormat,
        label: Option<String>,
    },
    WriteTexture {
        texture_id: usize,
        region: TextureRegion,
        bytes_per_row: u32,
        data: Vec<u8>,
    },
    DestroyTexture {
        texture_id: usize,
    },
}

/// Mock implementation of [`RenderContext`].
///
/// Uses `parking_lot::Mutex` for interior mutability since trait methods take
/// `&self`. Whether the context reports itself as current can be toggled with
/// [`MockRenderContext::set_current`] to exercise lost-context paths.
///
/// # Example
///
/// ```rust
/// use glint_test_utils::{MockRenderContext, RenderContext};
///
/// let mock = MockRenderContext::new();
/// assert!(mock.is_current());
///
/// mock.set_current(false);
/// assert!(!mock.is_current());
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,
    next_texture_id: Mutex<usize>,
    current: AtomicBool,
    max_texture_dimension_2d: AtomicU32,
}

impl MockRenderContext {
    /// Create a new, current mock context with the default `wgpu` limits.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_texture_id: Mutex::new(0),
            current: AtomicBool::new(true),
            max_texture_dimension_2d: AtomicU32::new(
                Limits::default().max_texture_dimension_2d,
            ),
        }
    }

    /// Create a mock context that reports no current context.
    pub fn detached() -> Self {
        let mock = Self::new();
        mock.set_current(false);
        mock
    }

    pub fn set_current(&self, current: bool) {
        self.current.store(current, Ordering::SeqCst);
    }

    pub fn set_max_texture_dimension_2d(&self, max: u32) {
        self.max_texture_dimension_2d.store(max, Ordering::SeqCst);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Count texture creates.
    pub fn count_texture_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::CreateTexture { .. }))
            .count()
    }

    /// Count texture writes (uploads).
    pub fn count_texture_writes(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::WriteTexture { .. }))
            .count()
    }

    /// Count texture destroys.
    pub fn count_texture_destroys(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::DestroyTexture { .. }))
            .count()
    }

    /// Regions of every texture write, in call order.
    pub fn written_regions(&self) -> Vec<TextureRegion> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::WriteTexture { region, .. } => Some(*region),
                _ => None,
            })
            .collect()
    }

    /// Data of the most recent texture write.
    pub fn last_write_data(&self) -> Option<Vec<u8>> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::WriteTexture { data, .. } => Some(data.clone()),
            _ => None,
        })
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst)
    }

    fn max_texture_dimension_2d(&self) -> u32 {
        self.max_texture_dimension_2d.load(Ordering::SeqCst)
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let mut id = self.next_texture_id.lock();
        let texture_id = *id;
        *id += 1;

        self.calls.lock().push(RenderCall::CreateTexture {
            texture_id,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
            label: desc.label.map(|s| s.to_string()),
        });

        GpuTexture::mock(texture_id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        region: TextureRegion,
        bytes_per_row: u32,
        data: &[u8],
    ) {
        if let Some(texture_id) = texture.mock_id() {
            self.calls.lock().push(RenderCall::WriteTexture {
                texture_id,
                region,
                bytes_per_row,
                data: data.to_vec(),
            });
        }
    }

    fn destroy_texture(&self, texture: &GpuTexture) {
        if let Some(texture_id) = texture.mock_id() {
            self.calls
                .lock()
                .push(RenderCall::DestroyTexture { texture_id });
        }
    }
}

/// A quad draw recorded by [`MockQuadPass`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuad {
    pub texture_id: Option<usize>,
    pub quad: TexturedQuad,
    pub blend: BlendMode,
}

/// Mock implementation of [`QuadPass`] that records quads and blend changes.
#[derive(Debug, Default)]
pub struct MockQuadPass {
    blend: BlendMode,
    quads: Vec<RecordedQuad>,
    blend_changes: Vec<BlendMode>,
}

impl MockQuadPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a specific blend mode, as if the caller had set it.
    pub fn with_blend_mode(blend: BlendMode) -> Self {
        Self {
            blend,
            ..Self::default()
        }
    }

    pub fn quads(&self) -> &[RecordedQuad] {
        &self.quads
    }

    /// Every blend mode set on the pass, in order.
    pub fn blend_changes(&self) -> &[BlendMode] {
        &self.blend_changes
    }
}

impl QuadPass for MockQuadPass {
    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.blend_changes.push(mode);
    }

    fn draw_textured_quad(&mut self, texture: &GpuTexture, quad: TexturedQuad) {
        self.quads.push(RecordedQuad {
            texture_id: texture.mock_id(),
            quad,
            blend: self.blend,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad_pass::QuadFilter;

    fn texture_desc(width: u32, height: u32) -> TextureDescriptor<'static> {
        TextureDescriptor {
            label: Some("test_texture"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        }
    }

    #[test]
    fn test_mock_texture_creation() {
        let mock = MockRenderContext::new();
        let texture = mock.create_texture(&texture_desc(64, 16));

        assert!(texture.is_mock());
        assert_eq!(texture.width(), 64);
        assert_eq!(texture.height(), 16);
        assert_eq!(mock.count_texture_creates(), 1);
    }

    #[test]
    fn test_mock_texture_write_records_region_and_data() {
        let mock = MockRenderContext::new();
        let texture = mock.create_texture(&texture_desc(4, 4));

        let region = TextureRegion::new(1, 2, 2, 1);
        mock.write_texture(&texture, region, 8, &[1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(mock.count_texture_writes(), 1);
        assert_eq!(mock.written_regions(), vec![region]);
        assert_eq!(mock.last_write_data(), Some(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn test_mock_current_toggle() {
        let mock = MockRenderContext::detached();
        assert!(!mock.is_current());
        mock.set_current(true);
        assert!(mock.is_current());
    }

    #[test]
    fn test_clear_calls() {
        let mock = MockRenderContext::new();
        let texture = mock.create_texture(&texture_desc(8, 8));
        mock.destroy_texture(&texture);
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.count_texture_destroys(), 1);

        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_mock_quad_pass_records_blend() {
        let mock = MockRenderContext::new();
        let texture = mock.create_texture(&texture_desc(8, 8));
        let mut pass = MockQuadPass::new();

        pass.set_blend_mode(BlendMode::Alpha);
        pass.draw_textured_quad(&texture, TexturedQuad::full(8.0, 8.0, QuadFilter::Linear));

        assert_eq!(pass.quads().len(), 1);
        assert_eq!(pass.quads()[0].blend, BlendMode::Alpha);
        assert_eq!(pass.quads()[0].texture_id, Some(0));
        assert_eq!(pass.blend_changes(), &[BlendMode::Alpha]);
    }
}
