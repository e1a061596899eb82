pub mod health;
pub mod publish;
