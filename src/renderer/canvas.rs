//! 2D canvas backend

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{DrawCommand, Scene};
use crate::assets::SpriteId;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: HashMap<SpriteId, HtmlImageElement>,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            images: HashMap::new(),
        })
    }

    /// Register a sprite image (only call for images that finished loading)
    pub fn add_image(&mut self, id: SpriteId, image: HtmlImageElement) {
        self.images.insert(id, image);
    }

    pub fn draw(&self, scene: &Scene) {
        for command in &scene.commands {
            let result = match command {
                DrawCommand::Fill { rect, color } => {
                    self.ctx.set_fill_style_str(color);
                    self.ctx.fill_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                    Ok(())
                }
                DrawCommand::Sprite { id, rect } => match self.images.get(id) {
                    Some(image) => self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    ),
                    None => Ok(()),
                },
                DrawCommand::Text {
                    text,
                    pos,
                    size,
                    align,
                } => {
                    self.ctx.set_fill_style_str(super::scene::INK);
                    self.ctx.set_font(&format!("bold {}px monospace", size));
                    self.ctx.set_text_align(align.as_str());
                    self.ctx.fill_text(text, pos.x as f64, pos.y as f64)
                }
            };
            if let Err(e) = result {
                log::debug!("Draw command failed: {:?}", e);
            }
        }
    }
}
