pub mod category;
pub mod product;
pub mod user;

#[allow(unused)]
const INIT_SYSTEM_ORDER: i32 = 0;
const INIT_USER_ORDER: i32 = INIT_SYSTEM_ORDER + 1;

const INIT_CATALOG_ORDER: i32 = 100;
const INIT_CATEGORY_ORDER: i32 = INIT_CATALOG_ORDER + 1;
const INIT_PRODUCT_ORDER: i32 = INIT_CATEGORY_ORDER + 1;
