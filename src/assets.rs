use crate::config;
use crate::core::font::Font;
use crate::core::gfx::{Backend, Texture};
use crate::game::rank::{Rank, ALL_RANKS};
use crate::game::GameMode;
use crate::ui::color;
use image::codecs::gif::GifDecoder;
use image::{imageops, AnimationDecoder, Rgba, RgbaImage};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

// Decoded animation clips are capped to this footprint, like the source GIFs
// were authored for.
const CLIP_MAX_W: f32 = 480.0; // 0.6 * design width
const CLIP_MAX_H: f32 = 240.0; // 0.4 * design height

const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// One decoded, uploaded animation frame.
#[derive(Clone, Debug)]
pub struct GifFrame {
    pub texture_key: String,
    pub width: f32,
    pub height: f32,
    pub duration: Duration,
}

/// A looping animation: frames plus per-frame display durations.
#[derive(Clone, Debug, Default)]
pub struct GifClip {
    pub frames: Vec<GifFrame>,
}

/// Playback cursor for a [`GifClip`]. Advances on its own wall clock,
/// independent of the game tick.
#[derive(Clone, Debug)]
pub struct GifPlayer {
    index: usize,
    last_update: Instant,
}

impl GifPlayer {
    pub fn new() -> Self {
        GifPlayer {
            index: 0,
            last_update: Instant::now(),
        }
    }

    /// Steps to the next frame once the current frame's duration has passed.
    pub fn advance(&mut self, clip: &GifClip, now: Instant) {
        if clip.frames.is_empty() {
            return;
        }
        self.index %= clip.frames.len();
        if now.duration_since(self.last_update) >= clip.frames[self.index].duration {
            self.index = (self.index + 1) % clip.frames.len();
            self.last_update = now;
        }
    }

    pub fn frame<'a>(&self, clip: &'a GifClip) -> Option<&'a GifFrame> {
        clip.frames.get(self.index % clip.frames.len().max(1))
    }
}

pub struct AssetManager {
    pub textures: HashMap<String, Texture>,
    texture_dims: HashMap<String, (u32, u32)>,
    fonts: HashMap<&'static str, Font>,
    clips: HashMap<String, GifClip>,
}

impl AssetManager {
    pub fn new() -> Self {
        AssetManager {
            textures: HashMap::new(),
            texture_dims: HashMap::new(),
            fonts: HashMap::new(),
            clips: HashMap::new(),
        }
    }

    /// Uploads everything the screens reference. Each asset that fails to
    /// load is replaced with a placeholder; only GPU errors propagate.
    pub fn load_initial_assets(
        &mut self,
        backend: &mut Backend,
        mode: GameMode,
    ) -> Result<(), Box<dyn Error>> {
        info!("Loading assets...");
        let theme = color::theme_for(mode);

        let background = load_image_or(config::BACKGROUND_TEXTURE_PATH, || {
            solid_image(1, 1, theme.backdrop)
        });
        self.insert_texture(backend, "background", &background)?;

        let title = load_image_or(config::TITLE_TEXTURE_PATH, || {
            solid_image(1, 1, [0.0, 0.0, 0.0, 0.0])
        });
        self.insert_texture(backend, "title", &title)?;

        let arrow = load_image_or(config::ARROW_TEXTURE_PATH, arrow_glyph_image);
        self.insert_texture(backend, "arrow", &arrow)?;

        self.load_font(backend, "arcade", config::ARCADE_FONT_TEXTURE_PATH)?;

        self.load_gif_clip(backend, "dancing".to_string(), Path::new(config::DANCING_GIF_PATH))?;
        if mode == GameMode::Ranked {
            for rank in ALL_RANKS {
                let path =
                    Path::new(config::RANK_GIF_DIR).join(format!("{}.gif", rank_clip_key(rank)));
                self.load_gif_clip(backend, rank_clip_key(rank), &path)?;
            }
        }

        info!("Assets loaded ({} textures).", self.textures.len());
        Ok(())
    }

    fn insert_texture(
        &mut self,
        backend: &mut Backend,
        key: &str,
        image: &RgbaImage,
    ) -> Result<(), Box<dyn Error>> {
        let texture = backend.create_texture(image)?;
        self.textures.insert(key.to_string(), texture);
        self.texture_dims
            .insert(key.to_string(), (image.width(), image.height()));
        Ok(())
    }

    fn load_font(
        &mut self,
        backend: &mut Backend,
        name: &'static str,
        path: &str,
    ) -> Result<(), Box<dyn Error>> {
        match image::open(path) {
            Ok(img) => {
                let img = img.to_rgba8();
                let file_name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                self.insert_texture(backend, &file_name, &img)?;
                let font = Font::new(file_name, img.width(), img.height());
                self.fonts.insert(name, font);
            }
            Err(e) => {
                warn!("Failed to load font sheet '{}': {}. Text will not render.", path, e);
            }
        }
        Ok(())
    }

    fn load_gif_clip(
        &mut self,
        backend: &mut Backend,
        name: String,
        path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let frames = match decode_gif(path) {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Failed to load gif '{}': {}. Using placeholder.", path.display(), e);
                vec![(solid_image(100, 100, [0.0, 0.0, 0.0, 0.0]), DEFAULT_FRAME_DELAY)]
            }
        };

        let mut clip = GifClip::default();
        for (i, (image, duration)) in frames.iter().enumerate() {
            let key = format!("{}#{}", name, i);
            self.insert_texture(backend, &key, image)?;
            clip.frames.push(GifFrame {
                texture_key: key,
                width: image.width() as f32,
                height: image.height() as f32,
                duration: *duration,
            });
        }
        self.clips.insert(name, clip);
        Ok(())
    }

    pub fn clip(&self, name: &str) -> Option<&GifClip> {
        self.clips.get(name)
    }

    pub fn texture_dims(&self, key: &str) -> Option<(u32, u32)> {
        self.texture_dims.get(key).copied()
    }

    pub fn fonts(&self) -> &HashMap<&'static str, Font> {
        &self.fonts
    }
}

pub fn rank_clip_key(rank: Rank) -> String {
    format!("rank_{}", rank.letter().to_lowercase())
}

fn load_image_or(path: &str, fallback: impl FnOnce() -> RgbaImage) -> RgbaImage {
    match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!("Failed to load '{}': {}. Using fallback.", path, e);
            fallback()
        }
    }
}

fn solid_image(w: u32, h: u32, rgba: [f32; 4]) -> RgbaImage {
    let pixel = Rgba([
        (rgba[0] * 255.0) as u8,
        (rgba[1] * 255.0) as u8,
        (rgba[2] * 255.0) as u8,
        (rgba[3] * 255.0) as u8,
    ]);
    RgbaImage::from_pixel(w, h, pixel)
}

/// Placeholder arrow glyph: a white upward triangle, rotated per lane at draw
/// time. Stands in when `assets/graphics/arrow.png` is absent.
fn arrow_glyph_image() -> RgbaImage {
    const SIZE: u32 = 64;
    let mut img = RgbaImage::new(SIZE, SIZE);
    let cx = (SIZE / 2) as f32;
    for y in 0..SIZE {
        let half_width = (y as f32 / SIZE as f32) * cx;
        for x in 0..SIZE {
            if (x as f32 + 0.5 - cx).abs() <= half_width {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
    }
    img
}

fn decode_gif(path: &Path) -> Result<Vec<(RgbaImage, Duration)>, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    let decoder = GifDecoder::new(reader)?;
    let frames = decoder.into_frames().collect_frames()?;
    if frames.is_empty() {
        return Err("gif has no frames".into());
    }

    let mut out = Vec::with_capacity(frames.len());
    for frame in frames {
        let mut duration = Duration::from(frame.delay());
        if duration.is_zero() {
            duration = DEFAULT_FRAME_DELAY;
        }
        let buffer = frame.into_buffer();
        let (w, h) = (buffer.width() as f32, buffer.height() as f32);
        let scale = (CLIP_MAX_W / w).min(CLIP_MAX_H / h).min(1.0);
        let image = if scale < 1.0 {
            imageops::resize(
                &buffer,
                (w * scale) as u32,
                (h * scale) as u32,
                imageops::FilterType::Lanczos3,
            )
        } else {
            buffer
        };
        out.push((image, duration));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_with_delays(ms: &[u64]) -> GifClip {
        GifClip {
            frames: ms
                .iter()
                .enumerate()
                .map(|(i, &d)| GifFrame {
                    texture_key: format!("clip#{}", i),
                    width: 10.0,
                    height: 10.0,
                    duration: Duration::from_millis(d),
                })
                .collect(),
        }
    }

    #[test]
    fn player_waits_out_the_current_frame_delay() {
        let clip = clip_with_delays(&[100, 100]);
        let mut player = GifPlayer::new();
        let t0 = player.last_update;

        player.advance(&clip, t0 + Duration::from_millis(50));
        assert_eq!(player.frame(&clip).unwrap().texture_key, "clip#0");

        player.advance(&clip, t0 + Duration::from_millis(150));
        assert_eq!(player.frame(&clip).unwrap().texture_key, "clip#1");
    }

    #[test]
    fn player_wraps_around_the_clip() {
        let clip = clip_with_delays(&[10, 10]);
        let mut player = GifPlayer::new();
        let t0 = player.last_update;
        player.advance(&clip, t0 + Duration::from_millis(20));
        player.advance(&clip, t0 + Duration::from_millis(40));
        assert_eq!(player.frame(&clip).unwrap().texture_key, "clip#0");
    }

    #[test]
    fn per_frame_delays_are_respected() {
        let clip = clip_with_delays(&[30, 500]);
        let mut player = GifPlayer::new();
        let t0 = player.last_update;
        player.advance(&clip, t0 + Duration::from_millis(40));
        assert_eq!(player.frame(&clip).unwrap().texture_key, "clip#1");
        // Frame 1 holds for half a second.
        player.advance(&clip, t0 + Duration::from_millis(140));
        assert_eq!(player.frame(&clip).unwrap().texture_key, "clip#1");
    }

    #[test]
    fn empty_clip_never_panics() {
        let clip = GifClip::default();
        let mut player = GifPlayer::new();
        player.advance(&clip, Instant::now());
        assert!(player.frame(&clip).is_none());
    }

    #[test]
    fn arrow_placeholder_is_a_solid_triangle() {
        let img = arrow_glyph_image();
        // Apex row is empty at the edges, base row is nearly full.
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(32, 63)[3], 255);
        assert_eq!(img.get_pixel(2, 63)[3], 255);
        // Upper corners stay transparent.
        assert_eq!(img.get_pixel(63, 0)[3], 0);
    }

    #[test]
    fn rank_clip_keys_are_lowercased_letters() {
        assert_eq!(rank_clip_key(Rank::S), "rank_s");
        assert_eq!(rank_clip_key(Rank::D), "rank_d");
    }
}
