pub mod foto_incidente;
pub mod incidente;
pub mod usuario;
