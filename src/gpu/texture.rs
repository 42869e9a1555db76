// ============================================================================
// IMAGE TEXTURE — one-time upload of the decoded image to the GPU
// ============================================================================

use crate::log_warn;
use crate::ppm::{PixelBuffer, Rgba};

/// Stand-in for images with no pixels; wgpu rejects zero-sized textures.
static PLACEHOLDER: [Rgba; 1] = [Rgba::opaque(0, 0, 0)];

/// A GPU-side texture holding the viewed image, plus the bind group the quad
/// pipeline samples it through.
pub struct ImageTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl ImageTexture {
    /// Create the texture and upload every pixel of `image` in one go.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bind_group_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &PixelBuffer,
    ) -> Self {
        let (width, height, data) = upload_source(image);
        if image.is_empty() {
            log_warn!(
                "Image is {}x{}; showing a 1x1 placeholder",
                image.width(),
                image.height()
            );
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ImageTexture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ImageTexture bind group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            view,
            bind_group,
            width,
            height,
        }
    }
}

/// Dimensions and bytes actually sent to the GPU for `image`.
fn upload_source(image: &PixelBuffer) -> (u32, u32, &[u8]) {
    if image.is_empty() {
        (1, 1, bytemuck::cast_slice(&PLACEHOLDER[..]))
    } else {
        (image.width(), image.height(), image.as_rgba_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppm;
    use std::io::Cursor;

    #[test]
    fn empty_image_uploads_placeholder() {
        let image = ppm::decode(Cursor::new(&b"P6\n0 3\n255\n"[..])).unwrap();
        let (w, h, data) = upload_source(&image);
        assert_eq!((w, h), (1, 1));
        assert_eq!(data, &[0, 0, 0, 255]);
    }

    #[test]
    fn regular_image_uploads_its_own_bytes() {
        let image = ppm::decode(Cursor::new(&b"P6\n2 1\n255\n\x01\x02\x03\x04\x05\x06"[..])).unwrap();
        let (w, h, data) = upload_source(&image);
        assert_eq!((w, h), (2, 1));
        assert_eq!(data, &[1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(data.len() as u32, 4 * w * h);
    }
}
