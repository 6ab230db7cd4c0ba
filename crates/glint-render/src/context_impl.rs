//! Implementation of the `RenderContext` trait for `GraphicsContext`.
//!
//! This lets renderers hold an `Arc<dyn RenderContext>` and run unchanged
//! against `MockRenderContext` in tests.

use crate::context::GraphicsContext;
use glint_core::profiling::profile_function;
use glint_test_utils::{GpuTexture, RenderContext, TextureRegion};
use wgpu::TextureDescriptor;

impl RenderContext for GraphicsContext {
    fn is_current(&self) -> bool {
        !self.is_lost()
    }

    fn max_texture_dimension_2d(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texture = self.device.create_texture(desc);
        GpuTexture::from_wgpu(texture)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        region: TextureRegion,
        bytes_per_row: u32,
        data: &[u8],
    ) {
        profile_function!();
        if region.is_empty() {
            return;
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.as_wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: region.x,
                    y: region.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(region.height),
            },
            wgpu::Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn destroy_texture(&self, texture: &GpuTexture) {
        texture.as_wgpu().destroy();
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "mock")]
    use glint_test_utils::MockRenderContext;
    use glint_test_utils::RenderContext;

    #[test]
    #[cfg(feature = "mock")]
    fn test_render_context_trait_object() {
        fn uses_render_context(ctx: &dyn RenderContext) -> bool {
            ctx.is_current() && ctx.max_texture_dimension_2d() > 0
        }

        let mock_ctx = MockRenderContext::new();
        assert!(uses_render_context(&mock_ctx));
    }

    #[test]
    #[ignore] // Requires GPU
    fn test_graphics_context_is_current() {
        if let Ok(ctx) = crate::GraphicsContext::new_owned_sync() {
            assert!(ctx.is_current());
            assert!(ctx.max_texture_dimension_2d() >= 2048);
        }
    }
}
