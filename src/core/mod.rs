pub mod character_gen;
pub mod guild;
pub mod logging;
pub mod name_gen;
pub mod text_gen;
