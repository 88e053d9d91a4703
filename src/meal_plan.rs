use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four dish roles of a meal plan, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Course {
    Appetizer,
    SideDish,
    MainCourse,
    Drink,
}

impl Course {
    pub const ALL: [Course; 4] = [
        Course::Appetizer,
        Course::SideDish,
        Course::MainCourse,
        Course::Drink,
    ];

    /// Identity tag as it appears in plan JSON (`sideDish`, `mainCourse`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Course::Appetizer => "appetizer",
            Course::SideDish => "sideDish",
            Course::MainCourse => "mainCourse",
            Course::Drink => "drink",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Course::Appetizer => "Appetizer",
            Course::SideDish => "Side Dish",
            Course::MainCourse => "Main Course",
            Course::Drink => "Drink",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Course {
    type Err = String;

    /// Accepts the JSON tag (`sideDish`), kebab case (`side-dish`) or the label (`Side Dish`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "appetizer" => Ok(Course::Appetizer),
            "sidedish" => Ok(Course::SideDish),
            "maincourse" => Ok(Course::MainCourse),
            "drink" => Ok(Course::Drink),
            _ => Err(format!("unknown course: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPart {
    pub id: Course,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullMealPlan {
    pub country: String,
    pub appetizer: MealPart,
    pub side_dish: MealPart,
    pub main_course: MealPart,
    pub drink: MealPart,
    pub shopping_list: Vec<ShoppingCategory>,
}

impl FullMealPlan {
    pub fn part(&self, course: Course) -> &MealPart {
        match course {
            Course::Appetizer => &self.appetizer,
            Course::SideDish => &self.side_dish,
            Course::MainCourse => &self.main_course,
            Course::Drink => &self.drink,
        }
    }

    /// The four parts in display order.
    pub fn parts(&self) -> [&MealPart; 4] {
        [
            &self.appetizer,
            &self.side_dish,
            &self.main_course,
            &self.drink,
        ]
    }

    /// Returns a copy of the plan with `part` in its role's slot. The shopping list is left as is.
    pub fn with_part(&self, part: MealPart) -> FullMealPlan {
        let mut updated = self.clone();
        match part.id {
            Course::Appetizer => updated.appetizer = part,
            Course::SideDish => updated.side_dish = part,
            Course::MainCourse => updated.main_course = part,
            Course::Drink => updated.drink = part,
        }
        updated
    }
}

/// One dietary restriction, listed in the order used by the constraint clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DietaryFlag {
    GlutenFree,
    LowCarb,
    NoAlcohol,
    NoCoffee,
}

impl DietaryFlag {
    pub const ALL: [DietaryFlag; 4] = [
        DietaryFlag::GlutenFree,
        DietaryFlag::LowCarb,
        DietaryFlag::NoAlcohol,
        DietaryFlag::NoCoffee,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DietaryFlag::GlutenFree => "Gluten Free",
            DietaryFlag::LowCarb => "Low Carb",
            DietaryFlag::NoAlcohol => "No Alcohol",
            DietaryFlag::NoCoffee => "No Coffee",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealConstraints {
    pub gluten_free: bool,
    pub low_carb: bool,
    pub no_alcohol: bool,
    pub no_coffee: bool,
}

impl MealConstraints {
    pub fn is_set(&self, flag: DietaryFlag) -> bool {
        match flag {
            DietaryFlag::GlutenFree => self.gluten_free,
            DietaryFlag::LowCarb => self.low_carb,
            DietaryFlag::NoAlcohol => self.no_alcohol,
            DietaryFlag::NoCoffee => self.no_coffee,
        }
    }

    pub fn set(&mut self, flag: DietaryFlag, value: bool) {
        match flag {
            DietaryFlag::GlutenFree => self.gluten_free = value,
            DietaryFlag::LowCarb => self.low_carb = value,
            DietaryFlag::NoAlcohol => self.no_alcohol = value,
            DietaryFlag::NoCoffee => self.no_coffee = value,
        }
    }

    pub fn toggle(&mut self, flag: DietaryFlag) {
        let current = self.is_set(flag);
        self.set(flag, !current);
    }

    /// Active flags in fixed enumeration order.
    pub fn active(&self) -> impl Iterator<Item = DietaryFlag> + '_ {
        DietaryFlag::ALL.into_iter().filter(|flag| self.is_set(*flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: Course, name: &str) -> MealPart {
        MealPart {
            id,
            name: name.to_string(),
            description: String::new(),
            ingredients: vec![],
            instructions: vec![],
        }
    }

    #[test]
    fn course_parses_tags_kebab_case_and_labels() {
        assert_eq!("sideDish".parse::<Course>(), Ok(Course::SideDish));
        assert_eq!("main-course".parse::<Course>(), Ok(Course::MainCourse));
        assert_eq!("Side Dish".parse::<Course>(), Ok(Course::SideDish));
        assert_eq!("DRINK".parse::<Course>(), Ok(Course::Drink));
        assert!("dessert".parse::<Course>().is_err());
    }

    #[test]
    fn course_serializes_as_camel_case_tag() {
        let json = serde_json::to_string(&Course::MainCourse).unwrap();
        assert_eq!(json, "\"mainCourse\"");
        for course in Course::ALL {
            let value = serde_json::to_value(course).unwrap();
            assert_eq!(value.as_str(), Some(course.key()));
        }
    }

    #[test]
    fn with_part_replaces_only_the_matching_slot() {
        let plan = FullMealPlan {
            country: "Peru".to_string(),
            appetizer: part(Course::Appetizer, "Ceviche"),
            side_dish: part(Course::SideDish, "Papa a la Huancaina"),
            main_course: part(Course::MainCourse, "Lomo Saltado"),
            drink: part(Course::Drink, "Pisco Sour"),
            shopping_list: vec![ShoppingCategory {
                category: "Produce".to_string(),
                items: vec!["Limes".to_string()],
            }],
        };

        let updated = plan.with_part(part(Course::Drink, "Chicha Morada"));

        assert_eq!(updated.drink.name, "Chicha Morada");
        assert_eq!(updated.appetizer, plan.appetizer);
        assert_eq!(updated.main_course, plan.main_course);
        assert_eq!(updated.shopping_list, plan.shopping_list);
        assert_eq!(plan.drink.name, "Pisco Sour");
    }

    #[test]
    fn toggle_flips_a_single_flag() {
        let mut constraints = MealConstraints::default();
        constraints.toggle(DietaryFlag::NoCoffee);
        assert!(constraints.no_coffee);
        assert!(!constraints.gluten_free);
        constraints.toggle(DietaryFlag::NoCoffee);
        assert_eq!(constraints, MealConstraints::default());
    }

    #[test]
    fn plan_json_uses_camel_case_slots() {
        let plan = FullMealPlan {
            country: "Japan".to_string(),
            appetizer: part(Course::Appetizer, "Edamame"),
            side_dish: part(Course::SideDish, "Miso Soup"),
            main_course: part(Course::MainCourse, "Tonkatsu"),
            drink: part(Course::Drink, "Matcha"),
            shopping_list: vec![],
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["sideDish"]["id"], "sideDish");
        assert_eq!(value["mainCourse"]["name"], "Tonkatsu");
        assert!(value["shoppingList"].is_array());
    }
}
