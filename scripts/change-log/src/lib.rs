pub mod adapters {
    pub mod file_release_writer;
    pub mod octocrab;
}

pub mod domain {
    pub mod generate;
    pub mod models;
    pub mod release_builder;
    pub mod vrl;
}

pub mod ports {
    pub mod github;
    pub mod release_writer;
}
