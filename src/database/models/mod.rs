pub mod drink;

pub use drink::{
    seed_drink, Drink, DrinkLong, DrinkPatch, DrinkShort, Ingredient, IngredientColor, NewDrink,
    MAX_TITLE_CHARS,
};
