fn main() {
    stiletto::cli::run();
}
