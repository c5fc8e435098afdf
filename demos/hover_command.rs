use nalgebra::{Vector2, Vector3};
use uav_command::dynamics::{reference_solution, AffineSystem};
use uav_command::{
    AttitudeThrottleConverter, ConverterConfig, MotorModelConfig, Saturation, StateIntegrator,
};

// Example usage
fn main() {
    env_logger::init();

    // Thrust commands a path follower might produce for a 1 kg vehicle
    let converter = AttitudeThrottleConverter::new(ConverterConfig {
        throttle_min: 0.05,
        throttle_max: 0.95,
        motor: Some(MotorModelConfig {
            coefficients: vec![0.0, 0.04],
            min_bound: 0.0,
            max_bound: 0.0,
        }),
    })
    .expect("valid converter configuration");

    let commands = [
        ("hover", Vector3::new(0.0, 0.0, 9.81), 0.0),
        ("accelerate east", Vector3::new(3.0, 0.0, 9.81), 0.0),
        ("bank north-west", Vector3::new(-2.0, 2.0, 10.5), 1.0),
        ("free fall", Vector3::zeros(), 0.0),
    ];

    for (name, thrust, yaw) in commands {
        let setpoint = converter.convert(&thrust, yaw);
        println!("{}:", name);
        println!(
            "  Attitude (w, x, y, z): ({:.4}, {:.4}, {:.4}, {:.4})",
            setpoint.attitude.w, setpoint.attitude.i, setpoint.attitude.j, setpoint.attitude.k
        );
        println!(
            "  Roll/pitch/yaw: ({:.3}, {:.3}, {:.3})",
            setpoint.euler[0], setpoint.euler[1], setpoint.euler[2]
        );
        println!("  Throttle: {:.3}", setpoint.throttle);
    }

    // Fixed-step integration of the spring-mass plant against the ODE solver
    let system = AffineSystem::spring_mass();
    let mut integrator = StateIntegrator::new(
        Vector2::zeros(),
        Saturation::new(-100.0, 100.0).expect("valid bounds"),
    );
    let dt = 0.005;

    for k in 1..=1000 {
        let x = match integrator.integrate_with(dt, |x| system.derivative(x)) {
            Ok(x) => x,
            Err(e) => {
                println!("Integration failed: {}", e);
                return;
            }
        };

        if k % 200 == 0 {
            let t = k as f64 * dt;
            match reference_solution(&system, Vector2::zeros(), (0.0, t), 1e-9) {
                Ok(reference) => println!(
                    "t = {:.1}: euler ({:.4}, {:.4}), reference ({:.4}, {:.4})",
                    t, x[0], x[1], reference[0], reference[1]
                ),
                Err(e) => println!("Reference solution failed: {}", e),
            }
        }
    }
}
