fn main() {
    cycle_pipeline::cli::run();
}
