fn main() {
    envgroup::app::cli::run();
}
