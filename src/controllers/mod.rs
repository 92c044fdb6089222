pub mod route_controller;
