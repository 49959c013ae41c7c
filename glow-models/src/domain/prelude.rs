pub use crate::domain::{
    auth::{Claims, LoginRequest, LoginResponse},
    category::{CategoryInfo, CategoryInput, SeedCategory},
    common::{format_price, parse_bool, PathId},
    product::{
        InventoryStats, ProductInfo, ProductInput, ProductListParams, ProductListQuery, SeedProduct,
    },
    user::{RegisterUser, SeedUser, UpdateProfile, UpdateUser, UserInfo},
};
