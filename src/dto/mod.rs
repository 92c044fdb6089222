pub mod common_dto;
pub mod route_dto;
