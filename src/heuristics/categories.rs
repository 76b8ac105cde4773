//! Object categories the heuristic table knows about.
//!
//! Labels are matched after trimming and lower-casing, against the class
//! names the detector emits.

const BAKED: &[&str] = &["pizza", "cake", "donut", "sandwich", "hot dog"];
const PRODUCE: &[&str] = &["banana", "apple", "orange", "broccoli", "carrot"];
const BEVERAGE: &[&str] = &["cup", "wine glass", "bottle"];
const BOWL: &[&str] = &["bowl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Pizza, cake and other baked or fried dishes.
    Baked,
    Produce,
    Beverage,
    Bowl,
    Other,
}

/// Per-category overrides applied on top of the lighting rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryProfile {
    pub saturation: f64,
    pub warmth_floor: Option<f64>,
    pub angle: &'static str,
}

pub const DEFAULT_SATURATION: f64 = 55.0;
pub const DEFAULT_ANGLE: &str = "45°";

impl Category {
    pub fn of(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Category::Other;
        };
        let label = label.trim().to_lowercase();
        let label = label.as_str();

        if BAKED.contains(&label) {
            Category::Baked
        } else if PRODUCE.contains(&label) {
            Category::Produce
        } else if BEVERAGE.contains(&label) {
            Category::Beverage
        } else if BOWL.contains(&label) {
            Category::Bowl
        } else {
            Category::Other
        }
    }

    /// Dishes and produce. Drinks and bare bowls keep the default warmth.
    pub fn is_food(&self) -> bool {
        matches!(self, Category::Baked | Category::Produce)
    }

    pub fn profile(&self, label: Option<&str>) -> CategoryProfile {
        match self {
            Category::Baked => CategoryProfile {
                saturation: 65.0,
                warmth_floor: Some(20.0),
                angle: if is_pizza(label) { "90° overhead" } else { "45°" },
            },
            Category::Produce => CategoryProfile {
                saturation: 70.0,
                warmth_floor: None,
                angle: DEFAULT_ANGLE,
            },
            Category::Beverage => CategoryProfile {
                saturation: 45.0,
                warmth_floor: None,
                angle: "15° tilt",
            },
            Category::Bowl => CategoryProfile {
                saturation: 60.0,
                warmth_floor: None,
                angle: "60° tilt",
            },
            Category::Other => CategoryProfile {
                saturation: DEFAULT_SATURATION,
                warmth_floor: None,
                angle: DEFAULT_ANGLE,
            },
        }
    }
}

fn is_pizza(label: Option<&str>) -> bool {
    label
        .map(|l| l.trim().eq_ignore_ascii_case("pizza"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_categories() {
        assert_eq!(Category::of(Some("Pizza")), Category::Baked);
        assert_eq!(Category::of(Some("hot dog")), Category::Baked);
        assert_eq!(Category::of(Some("banana")), Category::Produce);
        assert_eq!(Category::of(Some("wine glass")), Category::Beverage);
        assert_eq!(Category::of(Some("bowl")), Category::Bowl);
        assert_eq!(Category::of(Some("person")), Category::Other);
        assert_eq!(Category::of(None), Category::Other);
    }

    #[test]
    fn only_dishes_and_produce_count_as_food() {
        assert!(Category::Baked.is_food());
        assert!(Category::Produce.is_food());
        assert!(!Category::Beverage.is_food());
        assert!(!Category::Bowl.is_food());
        assert!(!Category::Other.is_food());
    }

    #[test]
    fn pizza_is_shot_from_above() {
        let pizza = Category::Baked.profile(Some("pizza"));
        assert_eq!(pizza.angle, "90° overhead");
        let cake = Category::Baked.profile(Some("cake"));
        assert_eq!(cake.angle, "45°");
        assert_eq!(cake.warmth_floor, Some(20.0));
    }
}
