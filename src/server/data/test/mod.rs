mod account;
mod role;
mod table_filter;
mod tenant;
