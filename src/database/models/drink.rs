use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Longest title any store accepts, in characters.
pub const MAX_TITLE_CHARS: usize = 80;

/// A drink row as stored: the recipe is kept as serialized JSON text.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// Ingredient as exposed by the short projection: color only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientColor {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Fields for a new row; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDrink {
    pub title: String,
    pub recipe: String,
}

impl NewDrink {
    pub fn new(title: impl Into<String>, recipe: &[Ingredient]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            title: title.into(),
            recipe: serde_json::to_string(recipe)?,
        })
    }
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<String>,
}

impl DrinkPatch {
    pub fn new(title: Option<String>, recipe: Option<&[Ingredient]>) -> Result<Self, serde_json::Error> {
        Ok(Self {
            title,
            recipe: recipe.map(serde_json::to_string).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }

    pub fn apply(&self, drink: &mut Drink) {
        if let Some(title) = &self.title {
            drink.title = title.clone();
        }
        if let Some(recipe) = &self.recipe {
            drink.recipe = recipe.clone();
        }
    }
}

impl Drink {
    pub fn ingredients(&self) -> Result<Vec<Ingredient>, serde_json::Error> {
        serde_json::from_str(&self.recipe)
    }

    pub fn short(&self) -> Result<DrinkShort, serde_json::Error> {
        let recipe = self
            .ingredients()?
            .into_iter()
            .map(|i| IngredientColor { color: i.color })
            .collect();

        Ok(DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe,
        })
    }

    pub fn long(&self) -> Result<DrinkLong, serde_json::Error> {
        Ok(DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.ingredients()?,
        })
    }
}

/// The row inserted when the table is reset.
pub fn seed_drink() -> NewDrink {
    NewDrink {
        title: "water".to_string(),
        recipe: r#"[{"name":"water","color":"blue","parts":1}]"#.to_string(),
    }
}
