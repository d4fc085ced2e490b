mod categories;
mod costs;
mod items;
mod stub;
