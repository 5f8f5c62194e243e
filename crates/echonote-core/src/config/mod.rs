mod settings;

pub use settings::EchoConfig;
