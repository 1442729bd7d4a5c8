pub mod health;
pub mod repertoire;
