use darling::{FromAttributes, FromMeta};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Result};

/// Arguments of `#[seedable(meta(...))]`
#[derive(FromMeta, Clone, Debug)]
struct SeedableMeta {
    /// Table name, defaults to the snake-cased enum name
    name: Option<String>,
    #[darling(default)]
    order: Option<syn::Path>,
    /// Seed record type, must implement `SeedableTrait`
    model: syn::Path,
    create_table: syn::Path,
    #[darling(default)]
    create_indexes: Option<syn::Path>,
    #[darling(default)]
    seed_data: Option<syn::Path>,
}

#[derive(FromAttributes, Debug)]
#[darling(attributes(seedable))]
struct SeedableOpts {
    meta: SeedableMeta,
}

pub(crate) fn expand_derive_seedable_initializer(input: DeriveInput) -> Result<TokenStream> {
    let enum_data = match &input.data {
        Data::Enum(enum_data) => enum_data,
        _ => {
            return Err(Error::new_spanned(
                &input,
                "SeedableInitializer can only be derived for iden enums",
            ))
        }
    };

    let opts = SeedableOpts::from_attributes(&input.attrs)
        .map_err(|e| Error::new_spanned(&input, e.to_string()))?;
    let meta = opts.meta;

    let ident = &input.ident;
    let model_type = &meta.model;
    let create_table_fn = &meta.create_table;
    let name = meta
        .name
        .clone()
        .unwrap_or_else(|| ident.to_string().to_snake_case());
    let order = meta
        .order
        .as_ref()
        .map(|p| quote!(#p))
        .unwrap_or_else(|| quote!(0));
    let has_update_col = enum_data.variants.iter().any(|v| v.ident == "UpdatedAt");

    let create_indexes_impl = match &meta.create_indexes {
        Some(create_fn) => quote!(#create_fn(backend)),
        None => quote!(None),
    };
    let seed_data_impl = match &meta.seed_data {
        Some(seed_fn) => quote!(#seed_fn(ctx).await),
        None => quote!(Ok(None)),
    };

    Ok(quote! {
        impl SeedableInitializerTrait<#model_type> for #ident
        where
            Self: DataSeederTrait<#model_type>,
            #model_type: Clone + SeedableTrait,
        {}

        #[async_trait::async_trait]
        impl DataSeederTrait<#model_type> for #ident {
            async fn get_seed_data(&self, ctx: &mut InitContext) -> Result<Option<Vec<#model_type>>, DbErr> {
                #seed_data_impl
            }
        }

        #[async_trait::async_trait]
        impl GlowInitializer for #ident {
            fn order(&self) -> i32 {
                #order
            }

            fn name(&self) -> &str {
                #name
            }

            fn has_update_col(&self) -> bool {
                #has_update_col
            }

            fn to_create_table_stmt(&self, backend: sea_orm::DatabaseBackend) -> sea_orm::sea_query::TableCreateStatement {
                #create_table_fn(backend)
            }

            fn to_drop_table_stmt(&self, _: sea_orm::DatabaseBackend) -> sea_orm::sea_query::TableDropStatement {
                sea_orm::sea_query::Table::drop().table(Self::Table).if_exists().to_owned()
            }

            fn to_create_indexes_stmt(
                &self,
                backend: sea_orm::DatabaseBackend,
            ) -> Option<Vec<sea_orm::sea_query::IndexCreateStatement>> {
                #create_indexes_impl
            }

            async fn seeding_data(
                &self,
                transaction: &sea_orm::DatabaseTransaction,
                ctx: &mut InitContext,
            ) -> Result<(), sea_orm::DbErr> {
                self.seed_data(transaction, ctx).await
            }
        }
    })
}
