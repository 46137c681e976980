use colored::Colorize as _;

macro_rules! tests {
  ($($name:expr, $module:ident),*) => {
    // declare the modules for all tests
    $(
      mod $module;
    )*

    // list of all available integration tests
    const TEST_NAMES: &[&str] = &[$( $name ),*];

    // run a given test
    fn run_test(name: &str) {
      $(
        if name == $name {
          $module::fixture();
          return;
        }
      )*

      else {
        println!("{} is not a valid test. Possible values", name.red());

        for test_name in TEST_NAMES {
          println!("  -> {}", test_name.blue());
        }
      }
    }
  }
}

tests! {
  "shadow-map-complete", shadow_map_complete,
  "texture-rgba", texture_rgba,
  "shadow-pass-frames", shadow_pass_frames,
  "single-backend-per-thread", single_backend_per_thread
}

fn main() {
  let test_name = std::env::args().nth(1);

  if let Some(test_name) = test_name {
    println!("test name: {}", test_name.green());

    run_test(&test_name);
  } else {
    println!("Please provide a test name. Possible values");

    for test_name in TEST_NAMES {
      println!("  -> {}", test_name.blue());
    }
  }
}
