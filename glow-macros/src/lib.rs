mod active_value;
mod seed;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `GlowInitializer`, `DataSeederTrait` and `SeedableInitializerTrait` for a table iden enum.
///
/// ```ignore
/// #[derive(DeriveIden, SeedableInitializer)]
/// #[seedable(meta(
///     model = SeedCategory,
///     name = "categories",
///     order = INIT_CATEGORY_ORDER,
///     create_table = create_category_table,
///     create_indexes = create_category_indexes,
///     seed_data = seed_categories
/// ))]
/// pub enum Category { Table, Id, Name, Slug, CreatedAt, UpdatedAt }
/// ```
///
/// The expansion refers to `GlowInitializer`, `InitContext`, `DataSeederTrait`,
/// `SeedableInitializerTrait`, `SeedableTrait` and `DbErr` unqualified, so they
/// must be in scope at the derive site.
#[proc_macro_derive(SeedableInitializer, attributes(seedable))]
pub fn derive_seedable_initializer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match seed::expand_derive_seedable_initializer(input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Derives `sea_orm::IntoActiveValue` for active enums so they can sit in
/// `DeriveIntoActiveModel` structs.
#[proc_macro_derive(IntoActiveValue)]
pub fn derive_into_active_value(input: TokenStream) -> TokenStream {
    active_value::derive_into_active_value(input)
}
