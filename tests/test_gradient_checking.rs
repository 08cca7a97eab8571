// Numerical gradient checking using central finite differences.
// The per-sample gradients written by back-propagation must match the slope of
// the squared-error loss 0.5 * Σ(a - y)² measured by nudging one parameter.

use letter_perceptron::config::Hyperparameters;
use letter_perceptron::utils::Matrix;
use letter_perceptron::Network;

const EPSILON: f64 = 1e-5;
const TOLERANCE: f64 = 1e-4;

// Squared-error loss for one sample, evaluated with the exact sigmoid.
fn compute_loss(net: &Network, inputs: &[f64], label: &[u8]) -> f64 {
    let outputs = net.predict(inputs).unwrap();
    outputs
        .iter()
        .zip(label)
        .map(|(&a, &y)| {
            let e = a - f64::from(y);
            e * e
        })
        .sum::<f64>()
        / 2.0
}

fn perturb_weight(net: &Network, layer: usize, i: usize, j: usize, delta: f64) -> Network {
    let mut copy = net.clone();
    let target = copy.layer_mut(layer).unwrap();
    let mut weights = target.weights().unwrap().clone();
    weights.set(i, j, weights.get(i, j) + delta);
    let biases = target.biases().to_vec();
    target.set_parameters(weights, biases).unwrap();
    copy
}

fn perturb_bias(net: &Network, layer: usize, i: usize, delta: f64) -> Network {
    let mut copy = net.clone();
    let target = copy.layer_mut(layer).unwrap();
    let weights = target.weights().unwrap().clone();
    let mut biases = target.biases().to_vec();
    biases[i] += delta;
    target.set_parameters(weights, biases).unwrap();
    copy
}

fn numerical_gradient_weight(net: &Network, inputs: &[f64], label: &[u8], layer: usize, i: usize, j: usize) -> f64 {
    let plus = compute_loss(&perturb_weight(net, layer, i, j, EPSILON), inputs, label);
    let minus = compute_loss(&perturb_weight(net, layer, i, j, -EPSILON), inputs, label);
    (plus - minus) / (2.0 * EPSILON)
}

fn numerical_gradient_bias(net: &Network, inputs: &[f64], label: &[u8], layer: usize, i: usize) -> f64 {
    let plus = compute_loss(&perturb_bias(net, layer, i, EPSILON), inputs, label);
    let minus = compute_loss(&perturb_bias(net, layer, i, -EPSILON), inputs, label);
    (plus - minus) / (2.0 * EPSILON)
}

// Run back-propagation and compare every weight and bias gradient.
fn check_all_gradients(net: &Network, inputs: &[f64], label: &[u8]) {
    let mut analytic = net.clone();
    analytic.backprop(inputs, label).unwrap();

    for l in 1..net.layers().len() {
        let layer = &analytic.layers()[l];
        let grad_w = layer.weight_gradient_sample().unwrap();
        let (rows, cols) = grad_w.shape();
        for i in 0..rows {
            for j in 0..cols {
                let numerical = numerical_gradient_weight(net, inputs, label, l, i, j);
                let analytical = grad_w.get(i, j);
                assert!(
                    (numerical - analytical).abs() < TOLERANCE,
                    "layer {} weight [{},{}]: numerical={:.10}, analytical={:.10}",
                    l,
                    i,
                    j,
                    numerical,
                    analytical
                );
            }
        }
        for (i, &analytical) in layer.bias_gradient_sample().iter().enumerate() {
            let numerical = numerical_gradient_bias(net, inputs, label, l, i);
            assert!(
                (numerical - analytical).abs() < TOLERANCE,
                "layer {} bias [{}]: numerical={:.10}, analytical={:.10}",
                l,
                i,
                numerical,
                analytical
            );
        }
    }
}

// 2 -> 2 -> 2 network with hand-picked parameters.
fn fixed_network() -> Network {
    let mut net = Network::new(&[2, 2, 2], Hyperparameters::new(1, 1, 0.1), Some(1)).unwrap();
    net.layer_mut(1)
        .unwrap()
        .set_parameters(
            Matrix::from_rows(&[vec![0.5, 0.2], vec![0.3, 0.7]]).unwrap(),
            vec![0.1, 0.2],
        )
        .unwrap();
    net.layer_mut(2)
        .unwrap()
        .set_parameters(
            Matrix::from_rows(&[vec![0.4, 0.6], vec![-0.3, 0.8]]).unwrap(),
            vec![0.1, -0.2],
        )
        .unwrap();
    net
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_checking_fixed_two_layer() {
        let net = fixed_network();
        check_all_gradients(&net, &[1.0, 2.0], &[1, 0]);
    }

    #[test]
    fn test_gradient_checking_fixed_other_label() {
        let net = fixed_network();
        check_all_gradients(&net, &[1.0, 1.0], &[0, 1]);
    }

    #[test]
    fn test_gradient_checking_output_delta_by_hand() {
        let net = fixed_network();
        let mut analytic = net.clone();
        analytic.backprop(&[1.0, 2.0], &[1, 0]).unwrap();

        let out = &analytic.layers()[2];
        let hidden = &analytic.layers()[1];
        for k in 0..2 {
            let a = out.activations()[k];
            let y = if k == 0 { 1.0 } else { 0.0 };
            let expected = (a - y) * a * (1.0 - a);
            assert!((out.bias_gradient_sample()[k] - expected).abs() < 1e-12);
            for j in 0..2 {
                let w = out.weight_gradient_sample().unwrap().get(k, j);
                assert!((w - expected * hidden.activations()[j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_gradient_checking_random_binary_input() {
        let net = Network::new(&[3, 4, 2], Hyperparameters::new(1, 1, 0.1), Some(17)).unwrap();
        check_all_gradients(&net, &[1.0, 0.0, 1.0], &[0, 1]);
    }

    #[test]
    fn test_gradient_checking_deep_network() {
        let net = Network::new(&[4, 5, 3, 3], Hyperparameters::new(1, 1, 0.1), Some(99)).unwrap();
        check_all_gradients(&net, &[0.0, 1.0, 1.0, 0.0], &[0, 0, 1]);
    }

    #[test]
    fn test_backprop_is_repeatable() {
        let mut net = Network::new(&[3, 4, 2], Hyperparameters::new(1, 1, 0.1), Some(5)).unwrap();
        net.backprop(&[1.0, 1.0, 0.0], &[1, 0]).unwrap();
        let first = net.layers()[1].weight_gradient_sample().unwrap().clone();
        net.backprop(&[1.0, 1.0, 0.0], &[1, 0]).unwrap();
        assert_eq!(net.layers()[1].weight_gradient_sample().unwrap(), &first);
    }
}
