use crate::simulation::types::AssetId;
use crate::utils::color::tag_color;

const BACKGROUND_LIGHTNESS: f32 = 0.12;

/// Background collaborator: remembers which image is displayed behind the
/// particles and the clear colour that stands in for it.
#[derive(Debug, Clone)]
pub struct Background {
    current: Option<AssetId>,
    color: wgpu::Color,
}

impl Background {
    /// Start with `initial`, or plain black when there is no image.
    pub fn new(initial: Option<AssetId>) -> Self {
        let mut background = Self {
            current: None,
            color: wgpu::Color::BLACK,
        };
        background.set(initial);
        background
    }

    pub fn set(&mut self, image: Option<AssetId>) {
        match &image {
            Some(id) => {
                let [r, g, b] = tag_color(id, BACKGROUND_LIGHTNESS);
                self.color = wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: 1.0,
                };
                log::info!("Background set: {}", id);
            }
            None => {
                self.color = wgpu::Color::BLACK;
                log::info!("Background set to black (no image)");
            }
        }
        self.current = image;
    }

    pub fn current(&self) -> Option<&AssetId> {
        self.current.as_ref()
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_black() {
        let background = Background::new(None);
        assert!(background.current().is_none());
        assert_eq!(background.clear_color(), wgpu::Color::BLACK);
    }

    #[test]
    fn test_switches_on_selection() {
        let mut background = Background::new(Some(AssetId::from("a.png")));
        let first = background.clear_color();

        background.set(Some(AssetId::from("b.png")));
        assert_eq!(background.current().map(|id| id.as_ref()), Some("b.png"));

        background.set(Some(AssetId::from("a.png")));
        assert_eq!(background.clear_color(), first);
    }
}
