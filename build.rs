use std::{env, path::PathBuf, process::Command};

fn main() {
    println!("cargo::rustc-check-cfg=cfg(cuda_histogram)");
    println!("cargo:rerun-if-changed=src/cuda");
    println!("cargo:rerun-if-env-changed=COLOUR_HISTOGRAM_CUDA");
    println!("cargo:rerun-if-env-changed=COLOUR_HISTOGRAM_CUDA_ARCH");

    if env::var_os("COLOUR_HISTOGRAM_CUDA").is_none() {
        println!("cargo:warning=Building without CUDA (set COLOUR_HISTOGRAM_CUDA=1 to enable)");
        return;
    }

    println!("cargo:rustc-cfg=cuda_histogram");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    //
    // ---- Target architecture ----
    //
    let sm = env::var("COLOUR_HISTOGRAM_CUDA_ARCH").unwrap_or_else(|_| "75".to_string());
    let arch = format!("compute_{sm}");
    let code = format!("sm_{sm}");

    //
    // ---- Compile each .cu file into PTX ----
    //
    let kernels = ["src/cuda/kernels/colour_histogram.cu"];

    for kernel in kernels {
        let kpath = PathBuf::from(kernel);
        let name = kpath.file_stem().unwrap().to_str().unwrap();
        let ptx_file = out_dir.join(format!("{name}.ptx"));

        println!("cargo:warning=Compiling {kernel} → {name}.ptx");

        let status = Command::new("nvcc")
            .arg("-ptx")
            .arg("-o")
            .arg(&ptx_file)
            .arg(&kpath)
            .arg(format!("-arch={}", arch))
            .arg(format!("-code={}", code))
            .status()
            .expect("Failed to run nvcc");

        assert!(status.success(), "Failed to compile {kernel} to PTX");
    }
}
